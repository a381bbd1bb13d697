//! Password capture
//!
//! Interactive runs prompt without echo; scripted runs pass
//! `--password-stdin` and supply one line on standard input.

use std::io::BufRead;

use crate::crypto::Password;
use crate::error::{AegisError, AegisResult};

/// Prompt for a password (hidden input)
fn prompt_password(prompt: &str) -> AegisResult<Password> {
    rpassword::prompt_password(prompt)
        .map(Password::from)
        .map_err(|e| AegisError::Password(format!("Failed to read password: {}", e)))
}

fn reject_empty(password: Password) -> AegisResult<Password> {
    if password.is_empty() {
        return Err(AegisError::Password("Password must not be empty".into()));
    }
    Ok(password)
}

/// Prompt once, for unsealing
pub fn prompt_existing_password() -> AegisResult<Password> {
    reject_empty(prompt_password("Enter password: ")?)
}

/// Prompt twice and require a match, for sealing
pub fn prompt_new_password() -> AegisResult<Password> {
    let first = reject_empty(prompt_password("Enter password: ")?)?;
    let second = prompt_password("Confirm password: ")?;

    if first != second {
        return Err(AegisError::Password("Passwords do not match".into()));
    }
    Ok(first)
}

/// Read a password from the first line of `reader`
///
/// The trailing newline (`\n` or `\r\n`) is dropped; everything else on the
/// line is part of the password.
pub fn read_password_line<R: BufRead>(mut reader: R) -> AegisResult<Password> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .map_err(|e| AegisError::Password(format!("Failed to read password from stdin: {}", e)))?;

    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }

    reject_empty(Password::from(line))
}

/// Obtain the password for a run
pub fn read_password(from_stdin: bool, confirm: bool) -> AegisResult<Password> {
    if from_stdin {
        read_password_line(std::io::stdin().lock())
    } else if confirm {
        prompt_new_password()
    } else {
        prompt_existing_password()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_password_line_strips_newline() {
        let password = read_password_line(Cursor::new("hunter2\n")).unwrap();
        assert_eq!(password.as_bytes(), b"hunter2");

        let password = read_password_line(Cursor::new("hunter2\r\nignored\n")).unwrap();
        assert_eq!(password.as_bytes(), b"hunter2");
    }

    #[test]
    fn test_read_password_line_keeps_spaces() {
        let password = read_password_line(Cursor::new(" two words \n")).unwrap();
        assert_eq!(password.as_bytes(), b" two words ");
    }

    #[test]
    fn test_read_password_line_without_newline() {
        let password = read_password_line(Cursor::new("last")).unwrap();
        assert_eq!(password.as_bytes(), b"last");
    }

    #[test]
    fn test_empty_password_rejected() {
        for input in ["", "\n"] {
            let result = read_password_line(Cursor::new(input));
            assert!(matches!(result, Err(AegisError::Password(_))));
        }
    }
}
