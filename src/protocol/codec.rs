//! Wire encoding for completion responses
//!
//! A response is newline-delimited text. Every line but the last is either an
//! info line (`_info_ <text>`) or a candidate (`<text>` or
//! `<text>\t<description>`). The last line is the directive as a decimal
//! bitmask.

use std::io::{self, Write};

use super::{Candidate, Directive, Entry, FIELD_SEPARATOR, INFO_MARKER, InfoLine, Response};

/// Encode a response into its wire text
pub fn encode(response: &Response) -> String {
    let mut out = String::new();
    for entry in response.entries() {
        push_entry(&mut out, entry);
        out.push('\n');
    }
    out.push_str(&response.directive().bits().to_string());
    out.push('\n');
    out
}

/// Decode wire text into a response.
///
/// Never fails: a trailing line that is not a directive is kept as an entry
/// and the directive falls back to [`Directive::DEFAULT`].
pub fn decode(text: &str) -> Response {
    let mut lines: Vec<&str> = text.lines().collect();
    let mut response = Response::new();

    if let Some(last) = lines.last()
        && let Some(directive) = parse_directive(last)
    {
        response.set_directive(directive);
        lines.pop();
    }

    for line in lines {
        response.push(decode_entry(line));
    }
    response
}

impl Response {
    /// Stream the wire encoding of this response
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(encode(self).as_bytes())?;
        writer.flush()
    }
}

fn push_entry(out: &mut String, entry: &Entry) {
    match entry {
        Entry::Info(info) => {
            out.push_str(INFO_MARKER);
            out.push_str(info.text());
        }
        Entry::Candidate(candidate) => {
            out.push_str(candidate.text());
            if let Some(description) = candidate.description() {
                out.push(FIELD_SEPARATOR);
                out.push_str(description);
            }
        }
    }
}

/// Some programs prefix the directive with a colon (`:4`); accept both forms.
fn parse_directive(line: &str) -> Option<Directive> {
    let digits = line.strip_prefix(':').unwrap_or(line);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u32>().ok().map(Directive::from_bits_retain)
}

fn decode_entry(line: &str) -> Entry {
    if let Some(info) = line.strip_prefix(INFO_MARKER) {
        return Entry::Info(InfoLine::new(info));
    }
    match line.split_once(FIELD_SEPARATOR) {
        Some((text, description)) => {
            Entry::Candidate(Candidate::with_description(text, description))
        }
        None => Entry::Candidate(Candidate::new(line)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn texts(response: &Response) -> Vec<&str> {
        response.candidates().map(Candidate::text).collect()
    }

    #[test]
    fn test_encode_layout() {
        let mut response = Response::new();
        response.push_candidate(Candidate::with_description("install", "install a chart"));
        response.push_info(InfoLine::new("no more args"));
        response.push_candidate(Candidate::new("list"));
        let response = response.with_directive(Directive::NO_FILE_COMP);

        assert_eq!(
            encode(&response),
            "install\tinstall a chart\n_info_ no more args\nlist\n4\n"
        );
    }

    #[test]
    fn test_encode_empty_response() {
        assert_eq!(encode(&Response::new()), "0\n");
    }

    #[test]
    fn test_decode_splits_on_first_tab_only() {
        let response = decode("a\tb\tc\n0\n");
        let candidate = response.candidates().next().unwrap();
        assert_eq!(candidate.text(), "a");
        assert_eq!(candidate.description(), Some("b c"));
    }

    #[test]
    fn test_decode_malformed_directive_becomes_candidate() {
        let response = decode("foo\nbar\n");
        assert_eq!(response.directive(), Directive::DEFAULT);
        assert_eq!(texts(&response), vec!["foo", "bar"]);
    }

    #[test]
    fn test_decode_colon_prefixed_directive() {
        let response = decode("foo\n:6\n");
        assert_eq!(response.directive(), Directive::NO_SPACE | Directive::NO_FILE_COMP);
        assert_eq!(texts(&response), vec!["foo"]);
    }

    #[test]
    fn test_decode_negative_directive_is_not_a_directive() {
        let response = decode("foo\n-1\n");
        assert_eq!(response.directive(), Directive::DEFAULT);
        assert_eq!(texts(&response), vec!["foo", "-1"]);
    }

    #[test]
    fn test_decode_empty_input() {
        let response = decode("");
        assert!(response.entries().is_empty());
        assert_eq!(response.directive(), Directive::DEFAULT);
    }

    #[test]
    fn test_decode_crlf() {
        let response = decode("foo\tdesc\r\n2\r\n");
        assert_eq!(response.directive(), Directive::NO_SPACE);
        assert_eq!(
            response.candidates().next().unwrap().description(),
            Some("desc")
        );
    }

    #[test]
    fn test_flag_independence() {
        let response = Response::new().with_directive(Directive::NO_SPACE | Directive::NO_FILE_COMP);
        let decoded = decode(&encode(&response)).directive();

        assert!(decoded.contains(Directive::NO_SPACE));
        assert!(decoded.contains(Directive::NO_FILE_COMP));
        assert!(!decoded.contains(Directive::FILTER_DIRS));
        assert!(!decoded.contains(Directive::FILTER_FILE_EXT));
        assert!(!decoded.contains(Directive::ERROR));
    }

    #[test]
    fn test_unknown_bits_survive() {
        let decoded = decode("80\n").directive();
        assert_eq!(decoded.bits(), 80);
        assert!(decoded.contains(Directive::FILTER_DIRS));
        assert!(!decoded.contains(Directive::FILTER_FILE_EXT));
    }

    #[test]
    fn test_write_to() {
        let mut buf = Vec::new();
        let response = Response::new().with_directive(Directive::ERROR);
        response.write_to(&mut buf).unwrap();
        assert_eq!(buf, b"1\n");
    }

    fn field() -> impl Strategy<Value = String> {
        // Texts that do not collide with the info marker
        "[a-zA-Z0-9 ./:=@-]{0,12}".prop_filter("marker collision", |s| !s.starts_with(INFO_MARKER))
    }

    fn entry() -> impl Strategy<Value = Entry> {
        prop_oneof![
            (field(), proptest::option::of("[a-zA-Z0-9 ,.()]{1,20}")).prop_map(|(text, desc)| {
                let candidate = match desc {
                    Some(desc) => Candidate::with_description(text, desc),
                    None => Candidate::new(text),
                };
                Entry::Candidate(candidate)
            }),
            "[a-zA-Z0-9 ,.()]{0,30}".prop_map(|text| Entry::Info(InfoLine::new(text))),
        ]
    }

    proptest! {
        #[test]
        fn prop_round_trip(entries in proptest::collection::vec(entry(), 0..16), bits in 0u32..=31) {
            let mut response = Response::new().with_directive(Directive::from_bits_retain(bits));
            for entry in entries {
                response.push(entry);
            }
            prop_assert_eq!(decode(&encode(&response)), response);
        }
    }
}
