//! `$field` templates rendered against a [`Track`].
//!
//! Syntax: `$name` or `${name}` substitutes [`Track::display_field`];
//! `$$` is a literal dollar sign. Names are ASCII alphanumerics and `_`.

use crate::model::Track;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(String),
}

/// A parsed track template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackFormatter {
    template: String,
    segments: Vec<Segment>,
}

impl TrackFormatter {
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let segments = parse(&template);
        Self { template, segments }
    }

    /// Formatter showing a single field.
    pub fn for_field(field: &str) -> Self {
        Self::new(format!("${field}"))
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Fields referenced by the template, in order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Field(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    pub fn format(&self, track: &Track) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(name) => out.push_str(&track.display_field(name)),
            }
        }
        out
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn parse(template: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if c != '$' {
            literal.push(c);
            continue;
        }

        match chars.peek().copied() {
            Some((_, '$')) => {
                chars.next();
                literal.push('$');
            }
            Some((start, '{')) => {
                let rest = &template[start + 1..];
                match rest.find('}') {
                    Some(end) => {
                        flush(&mut literal, &mut segments);
                        segments.push(Segment::Field(rest[..end].to_string()));
                        // skip past the closing brace
                        let close = start + 1 + end;
                        while chars.next_if(|(i, _)| *i <= close).is_some() {}
                    }
                    None => literal.push('$'),
                }
            }
            Some((_, next)) if is_name_char(next) => {
                let mut name = String::new();
                while let Some((_, c)) = chars.next_if(|(_, c)| is_name_char(*c)) {
                    name.push(c);
                }
                flush(&mut literal, &mut segments);
                segments.push(Segment::Field(name));
            }
            _ => literal.push('$'),
        }
    }

    flush(&mut literal, &mut segments);
    segments
}

fn flush(literal: &mut String, segments: &mut Vec<Segment>) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}
