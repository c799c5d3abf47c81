use std::ffi::OsString;
use std::io::Write;

use itertools::Itertools;

/// Quotes every argument and follows each with a space: `"prog" "a" "b c" `.
pub fn quote_args<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .format_with("", |arg, f| f(&format_args!("\"{}\" ", AsRef::<str>::as_ref(arg))))
        .to_string()
}

pub fn echo_args<W: Write, S: AsRef<str>>(out: &mut W, args: &[S]) -> std::io::Result<()> {
    let mut buf = quote_args(args).into_bytes();
    buf.push(b'\n');
    out.write_all(&buf)
}

/// Lossy conversion for arguments that are not valid UTF-8.
pub fn lossy_args(args: impl IntoIterator<Item = OsString>) -> Vec<String> {
    args.into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_quotes_each_argument() {
        let mut out = Vec::new();
        echo_args(&mut out, &["prog", "a", "b c"]).unwrap();
        assert_eq!(out, b"\"prog\" \"a\" \"b c\" \n");
    }

    #[test]
    fn test_echo_no_arguments() {
        let mut out = Vec::new();
        echo_args::<_, &str>(&mut out, &[]).unwrap();
        assert_eq!(out, b"\n");
    }

    #[test]
    fn test_quote_keeps_order_and_empty_args() {
        assert_eq!(quote_args(&["x", "", "y"]), "\"x\" \"\" \"y\" ");
    }

    #[cfg(unix)]
    #[test]
    fn test_lossy_args() {
        use std::os::unix::ffi::OsStringExt;

        let args = lossy_args(vec![OsString::from("ok"), OsString::from_vec(vec![b'a', 0xff])]);
        assert_eq!(args, vec!["ok".to_owned(), "a\u{fffd}".to_owned()]);
    }
}
