//! Element selectors in the instrumentation server's query syntax
//!
//! A selector is a class name (or `*`) followed by attribute filters:
//! `android.widget.TextView id:'product_name' text:'Foo'`. An optional
//! `{text CONTAINS[c] '...'}` predicate matches on partial text.

use std::fmt;
use std::str::FromStr;

use crate::common::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    class: String,
    filters: Vec<(String, String)>,
    text_contains: Option<String>,
}

impl Selector {
    pub fn new(class: &str) -> Self {
        Self {
            class: class.to_string(),
            filters: Vec::new(),
            text_contains: None,
        }
    }

    /// Matches views of any class
    pub fn any() -> Self {
        Self::new("*")
    }

    pub fn attr(mut self, key: &str, value: &str) -> Self {
        self.filters.push((key.to_string(), value.to_string()));
        self
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn text(self, text: &str) -> Self {
        self.attr("text", text)
    }

    /// Matches id, text or content description
    pub fn marked(self, mark: &str) -> Self {
        self.attr("marked", mark)
    }

    pub fn checked(self, checked: bool) -> Self {
        self.attr("checked", if checked { "true" } else { "false" })
    }

    /// Case-insensitive partial text match
    pub fn containing_text(mut self, text: &str) -> Self {
        self.text_contains = Some(text.to_string());
        self
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn parse(s: &str) -> Result<Self> {
        let mut parser = Parser { src: s, pos: 0 };
        parser.skip_ws();
        let class = parser.take_while(|c| !c.is_whitespace());
        if class.is_empty() {
            return Err(Error::invalid_selector(s, "missing class name"));
        }

        let mut selector = Selector::new(class);
        loop {
            parser.skip_ws();
            match parser.peek() {
                None => break,
                Some('{') => {
                    let text = parser.predicate()?;
                    selector.text_contains = Some(text);
                }
                Some(_) => {
                    let key = parser.take_while(|c| c != ':' && !c.is_whitespace());
                    if key.is_empty() || !parser.eat(':') {
                        return Err(Error::invalid_selector(s, "expected key:value filter"));
                    }
                    let value = parser.value()?;
                    selector.filters.push((key.to_string(), value));
                }
            }
        }
        Ok(selector)
    }
}

impl FromStr for Selector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class)?;
        for (key, value) in &self.filters {
            write!(f, " {}:'{}'", key, escape(value))?;
        }
        if let Some(text) = &self.text_contains {
            write!(f, " {{text CONTAINS[c] '{}'}}", escape(text))?;
        }
        Ok(())
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        self.take_while(char::is_whitespace);
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c| !pred(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    /// Quoted value with backslash escapes, or a bare word
    fn value(&mut self) -> Result<String> {
        if !self.eat('\'') {
            return Ok(self.take_while(|c| !c.is_whitespace()).to_string());
        }
        let mut out = String::new();
        let mut chars = self.rest().char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => {
                    if let Some((_, escaped)) = chars.next() {
                        out.push(escaped);
                    }
                }
                '\'' => {
                    self.pos += i + 1;
                    return Ok(out);
                }
                c => out.push(c),
            }
        }
        Err(Error::invalid_selector(self.src, "unterminated quoted value"))
    }

    /// `{text CONTAINS[c] '...'}`
    fn predicate(&mut self) -> Result<String> {
        self.eat('{');
        self.skip_ws();
        let head = self.take_while(|c| c != '\'');
        let words: Vec<&str> = head.split_whitespace().collect();
        if words.len() != 2 || words[0] != "text" || !words[1].starts_with("CONTAINS") {
            return Err(Error::invalid_selector(self.src, "only {text CONTAINS '...'} is supported"));
        }
        let text = self.value()?;
        self.skip_ws();
        if !self.eat('}') {
            return Err(Error::invalid_selector(self.src, "unterminated predicate"));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_class_and_filters() {
        let s = Selector::parse("android.widget.TextView id:'product_name' text:'Acetylsalicylic Acid'")
            .unwrap();
        assert_eq!(s.class(), "android.widget.TextView");
        assert_eq!(s.filter("id"), Some("product_name"));
        assert_eq!(s.filter("text"), Some("Acetylsalicylic Acid"));
    }

    #[test]
    fn test_parse_tolerates_trailing_space() {
        let s = Selector::parse("android.widget.EditText id:'et_request_amount' ").unwrap();
        assert_eq!(s, Selector::new("android.widget.EditText").id("et_request_amount"));
    }

    #[test]
    fn test_render_matches_builder() {
        let s = Selector::new("android.widget.CheckBox").id("checkbox").checked(false);
        assert_eq!(s.to_string(), "android.widget.CheckBox id:'checkbox' checked:'false'");
    }

    #[test]
    fn test_quotes_are_escaped_and_parsed_back() {
        let s = Selector::new("android.widget.TextView").text("Children's Syrup");
        let rendered = s.to_string();
        assert_eq!(rendered, r"android.widget.TextView text:'Children\'s Syrup'");
        assert_eq!(Selector::parse(&rendered).unwrap(), s);
    }

    #[test]
    fn test_text_contains_predicate() {
        let s = Selector::any().containing_text("2008");
        assert_eq!(s.to_string(), "* {text CONTAINS[c] '2008'}");
        assert_eq!(Selector::parse(&s.to_string()).unwrap(), s);
    }

    #[test]
    fn test_bare_values() {
        let s = Selector::parse("ListView index:0").unwrap();
        assert_eq!(s.filter("index"), Some("0"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("TextView id").is_err());
        assert!(Selector::parse("TextView id:'open").is_err());
        assert!(Selector::parse("TextView {id = 'x'}").is_err());
    }
}
