//! Interactive prompts for the target directory and the go/no-go confirmation.
//!
//! Both prompts are generic over the reader and writer so tests can drive them
//! with in-memory buffers; the binary passes locked stdin/stdout.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Ask for the installation directory. An empty answer (or EOF) selects `default`.
pub fn prompt_target<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    default: &str,
) -> io::Result<PathBuf> {
    write!(output, "Installation directory [{}]: ", default)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();

    if answer.is_empty() {
        Ok(PathBuf::from(default))
    } else {
        Ok(PathBuf::from(expand_home(answer)))
    }
}

/// Ask a yes/no question. Only `y` or `yes` (any case) proceed; EOF refuses.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<bool> {
    write!(output, "{} [y/N]: ", question)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

/// Whether an answer counts as consent
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Expand a bare `~` or a leading `~/` using `$HOME`
fn expand_home(path: &str) -> String {
    let Ok(home) = std::env::var("HOME") else {
        return path.to_string();
    };
    if path == "~" {
        return home;
    }
    match path.strip_prefix("~/") {
        Some(rest) => format!("{}/{}", home.trim_end_matches('/'), rest),
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_prompt_target_uses_default_on_empty_answer() {
        let mut input = Cursor::new(b"\n".to_vec());
        let mut output = Vec::new();

        let target = prompt_target(&mut input, &mut output, "podstack-env").expect("prompt");
        assert_eq!(target, PathBuf::from("podstack-env"));
        assert_eq!(
            String::from_utf8(output).expect("utf8"),
            "Installation directory [podstack-env]: "
        );
    }

    #[test]
    fn test_prompt_target_uses_default_on_eof() {
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        let target = prompt_target(&mut input, &mut output, "podstack-env").expect("prompt");
        assert_eq!(target, PathBuf::from("podstack-env"));
    }

    #[test]
    fn test_prompt_target_trims_answer() {
        let mut input = Cursor::new(b"  /srv/dev  \n".to_vec());
        let mut output = Vec::new();
        let target = prompt_target(&mut input, &mut output, "x").expect("prompt");
        assert_eq!(target, PathBuf::from("/srv/dev"));
    }

    #[test]
    fn test_confirm_accepts_yes_and_y() {
        for answer in ["y\n", "yes\n", "Y\n", "YES\n", " yes \n"] {
            let mut input = Cursor::new(answer.as_bytes().to_vec());
            let mut output = Vec::new();
            assert!(confirm(&mut input, &mut output, "Proceed?").expect("confirm"), "{:?}", answer);
        }
    }

    #[test]
    fn test_confirm_refuses_everything_else() {
        for answer in ["n\n", "no\n", "\n", "yep\n", "ye\n", ""] {
            let mut input = Cursor::new(answer.as_bytes().to_vec());
            let mut output = Vec::new();
            assert!(!confirm(&mut input, &mut output, "Proceed?").expect("confirm"), "{:?}", answer);
        }
    }

    #[test]
    fn test_confirm_prompt_text() {
        let mut input = Cursor::new(b"n\n".to_vec());
        let mut output = Vec::new();
        confirm(&mut input, &mut output, "Install into 'dev'?").expect("confirm");
        assert_eq!(String::from_utf8(output).expect("utf8"), "Install into 'dev'? [y/N]: ");
    }

    #[test]
    fn test_expand_home_leaves_other_paths() {
        assert_eq!(expand_home("/abs/path"), "/abs/path");
        assert_eq!(expand_home("relative"), "relative");
        assert_eq!(expand_home("~user/env"), "~user/env");
    }

    #[test]
    fn test_expand_home_handles_bare_tilde() {
        let Ok(home) = std::env::var("HOME") else {
            return;
        };
        assert_eq!(expand_home("~"), home);
        assert_eq!(
            expand_home("~/dev-env"),
            format!("{}/dev-env", home.trim_end_matches('/'))
        );
    }
}
