//! Splits template source into tags, text and verbatim markup.
//!
//! Tag syntax is parsed with `nom`; anything that does not parse as a tag is
//! kept as text, so tokenizing never fails and never loses input.
use crate::node::{Attribute, RAW_TEXT_ELEMENTS};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{char, multispace0, multispace1, satisfy},
    combinator::{map, opt, recognize},
    sequence::{delimited, pair, preceded, terminated},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    StartTag {
        name: String,
        attributes: Vec<Attribute>,
        tail: String,
        self_closing: bool,
        offset: usize,
    },
    EndTag {
        name: String,
        raw: String,
        offset: usize,
    },
    Text(String),
    Raw(String),
}

/// Tokenizes `source`. Concatenating the source text of all tokens yields `source`.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;

    while pos < source.len() {
        let rest = &source[pos..];

        // Placeholders may contain `<`; skip them as a unit.
        if rest.starts_with("{$") {
            pos += rest.find('}').map_or(2, |end| end + 1);
            continue;
        }

        if rest.starts_with('<') {
            if let Ok((remaining, token)) = markup_token(rest, pos) {
                push_text(&mut tokens, &source[text_start..pos]);
                pos += rest.len() - remaining.len();

                let raw_text_name = match &token {
                    Token::StartTag {
                        name,
                        self_closing: false,
                        ..
                    } if is_raw_text(name) => Some(name.to_ascii_lowercase()),
                    _ => None,
                };
                tokens.push(token);

                if let Some(name) = raw_text_name {
                    let body = &source[pos..];
                    let end = body
                        .to_ascii_lowercase()
                        .find(&format!("</{}", name))
                        .unwrap_or(body.len());
                    push_text(&mut tokens, &body[..end]);
                    pos += end;
                }
                text_start = pos;
                continue;
            }
        }

        pos += rest.chars().next().map_or(1, char::len_utf8);
    }

    push_text(&mut tokens, &source[text_start..]);
    tokens
}

fn push_text(tokens: &mut Vec<Token>, text: &str) {
    if !text.is_empty() {
        tokens.push(Token::Text(text.to_string()));
    }
}

fn is_raw_text(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.iter().any(|n| n.eq_ignore_ascii_case(name))
}

fn markup_token(input: &str, offset: usize) -> IResult<&str, Token> {
    alt((
        map(comment, |raw: &str| Token::Raw(raw.to_string())),
        map(declaration, |raw: &str| Token::Raw(raw.to_string())),
        |i| end_tag(i, offset),
        |i| start_tag(i, offset),
    ))
    .parse(input)
}

// --- Verbatim constructs ---

fn comment(input: &str) -> IResult<&str, &str> {
    recognize((tag("<!--"), take_until("-->"), tag("-->"))).parse(input)
}

/// `<!doctype html>`, `<![CDATA[...]>`-style and `<?...?>` constructs.
fn declaration(input: &str) -> IResult<&str, &str> {
    recognize((alt((tag("<!"), tag("<?"))), take_until(">"), char('>'))).parse(input)
}

// --- Tags ---

fn tag_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c: char| c.is_ascii_alphabetic()),
        take_while(|c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | ':' | '_' | '.')),
    ))
    .parse(input)
}

fn end_tag(input: &str, offset: usize) -> IResult<&str, Token> {
    let (i, raw) = recognize((tag("</"), tag_name, multispace0, char('>'))).parse(input)?;
    let name = raw[2..]
        .trim_end_matches('>')
        .trim_end()
        .to_string();
    Ok((
        i,
        Token::EndTag {
            name,
            raw: raw.to_string(),
            offset,
        },
    ))
}

fn start_tag(input: &str, offset: usize) -> IResult<&str, Token> {
    let (i, name) = preceded(char('<'), tag_name).parse(input)?;
    let (i, attributes) = attributes(i)?;
    let (i, tail) = multispace0(i)?;
    let (i, slash) = terminated(opt(char('/')), char('>')).parse(i)?;

    Ok((
        i,
        Token::StartTag {
            name: name.to_string(),
            attributes,
            tail: tail.to_string(),
            self_closing: slash.is_some(),
            offset,
        },
    ))
}

// --- Attributes ---

fn attribute_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| {
        !c.is_whitespace() && !matches!(c, '/' | '>' | '=' | '"' | '\'' | '<')
    })
    .parse(input)
}

fn quoted_value(input: &str) -> IResult<&str, (Option<char>, &str)> {
    alt((
        map(
            delimited(char('"'), take_while(|c| c != '"'), char('"')),
            |v| (Some('"'), v),
        ),
        map(
            delimited(char('\''), take_while(|c| c != '\''), char('\'')),
            |v| (Some('\''), v),
        ),
    ))
    .parse(input)
}

fn unquoted_value(input: &str) -> IResult<&str, (Option<char>, &str)> {
    map(
        take_while1(|c: char| !c.is_whitespace() && !matches!(c, '>' | '"' | '\'' | '=' | '<' | '`')),
        |v| (None, v),
    )
    .parse(input)
}

/// `= value`, with optional whitespace around the equals sign.
fn assignment(input: &str) -> IResult<&str, (&str, Option<char>, &str)> {
    let (i, assign) = recognize((multispace0, char('='), multispace0)).parse(input)?;
    let (i, (quote, value)) = alt((quoted_value, unquoted_value)).parse(i)?;
    Ok((i, (assign, quote, value)))
}

/// Directive attributes may also take a bare quoted argument: `$action "signup"`.
fn directive_argument(input: &str) -> IResult<&str, (&str, Option<char>, &str)> {
    let (i, assign) = multispace1(input)?;
    let (i, (quote, value)) = quoted_value(i)?;
    Ok((i, (assign, quote, value)))
}

/// Attributes are separated by whitespace, except that a quoted value may be
/// followed directly by the next attribute (`href="x"class="y"`).
fn attributes(mut input: &str) -> IResult<&str, Vec<Attribute>> {
    let mut attributes: Vec<Attribute> = Vec::new();
    loop {
        let after_quote = attributes.last().is_some_and(|a| a.quote.is_some());
        match attribute(input, after_quote) {
            Ok((rest, attr)) => {
                attributes.push(attr);
                input = rest;
            }
            Err(nom::Err::Error(_)) => return Ok((input, attributes)),
            Err(e) => return Err(e),
        }
    }
}

fn attribute(input: &str, after_quote: bool) -> IResult<&str, Attribute> {
    let (i, leading) = if after_quote {
        multispace0(input)?
    } else {
        multispace1(input)?
    };
    let (i, name) = attribute_name(i)?;
    let (i, assigned) = if name.starts_with('$') {
        opt(alt((assignment, directive_argument))).parse(i)?
    } else {
        opt(assignment).parse(i)?
    };

    let (assign, quote, value) = match assigned {
        Some((assign, quote, value)) => (assign.to_string(), quote, Some(value.to_string())),
        None => (String::new(), None, None),
    };
    Ok((
        i,
        Attribute {
            leading: leading.to_string(),
            name: name.to_string(),
            assign,
            quote,
            value,
        },
    ))
}
