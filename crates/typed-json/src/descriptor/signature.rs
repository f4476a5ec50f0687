//! Textual descriptor signatures, the inverse of `TypeDescriptor`'s
//! `Display`.
//!
//! ```text
//! type   := "any" | scalar | "seq" ["<" type ">"] | "map" ["<" type "," type ">"] | record
//! scalar := "bool" | "int" | "float" | "str" | "date"
//! record := Name "{" [field ("," field)*] "}"
//! field  := name ":" type
//! ```
//!
//! A bare `seq` or `map` leaves its elements unresolved, exactly like
//! [`resolve`](super::resolve) without element descriptors. Record fields
//! parsed from text default to `null` and keep explicit nulls.

use super::{resolve, Container, FieldDescriptor, RecordDescriptor, TypeDescriptor};
use crate::error::{CodecError, Result};

/// Parses a signature such as `seq<map<str,date>>`.
pub fn parse_signature(input: &str) -> Result<TypeDescriptor> {
    let mut parser = SignatureParser { input, x: 0 };
    let descriptor = parser.read_type()?;
    parser.skip_whitespace();
    if parser.x < input.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(descriptor)
}

struct SignatureParser<'a> {
    input: &'a str,
    x: usize,
}

impl SignatureParser<'_> {
    fn error(&self, message: &str) -> CodecError {
        CodecError::Signature {
            position: self.x,
            message: message.to_string(),
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.x..];
        self.x += rest.len() - rest.trim_start().len();
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.input[self.x..].chars().next()
    }

    fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.x += ch.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, ch: char) -> Result<()> {
        if self.eat(ch) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{ch}'")))
        }
    }

    fn read_ident(&mut self) -> Result<&str> {
        self.skip_whitespace();
        let start = self.x;
        let rest = &self.input[start..];
        let len = rest
            .char_indices()
            .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
            .map_or(rest.len(), |(i, _)| i);
        if len == 0 {
            return Err(self.error("expected a type name"));
        }
        self.x += len;
        Ok(&self.input[start..start + len])
    }

    fn read_type(&mut self) -> Result<TypeDescriptor> {
        self.skip_whitespace();
        let start = self.x;
        let name = self.read_ident()?.to_string();
        let descriptor = match name.as_str() {
            "any" => TypeDescriptor::Inferred,
            "bool" | "boolean" => TypeDescriptor::bool(),
            "int" | "integer" | "long" | "i64" => TypeDescriptor::int(),
            "float" | "double" | "f64" => TypeDescriptor::float(),
            "str" | "string" => TypeDescriptor::str(),
            "date" => TypeDescriptor::date(),
            "seq" | "list" => {
                let elements = self.read_params()?;
                self.container(Container::Sequence, &elements, start)?
            }
            "map" => {
                let elements = self.read_params()?;
                self.container(Container::Mapping, &elements, start)?
            }
            _ => {
                if self.peek() != Some('{') {
                    self.x = start;
                    return Err(self.error(&format!("unknown type \"{name}\"")));
                }
                self.read_record(name)?
            }
        };
        Ok(descriptor)
    }

    fn container(
        &mut self,
        container: Container,
        elements: &[TypeDescriptor],
        start: usize,
    ) -> Result<TypeDescriptor> {
        match resolve(container, elements) {
            Ok(descriptor) => Ok((*descriptor).clone()),
            Err(CodecError::Arity { .. }) => {
                self.x = start;
                Err(self.error(&format!(
                    "{container} takes {} type parameter(s), got {}",
                    container.arity(),
                    elements.len()
                )))
            }
            Err(other) => Err(other),
        }
    }

    fn read_params(&mut self) -> Result<Vec<TypeDescriptor>> {
        let mut params = Vec::new();
        if !self.eat('<') {
            return Ok(params);
        }
        loop {
            params.push(self.read_type()?);
            if self.eat('>') {
                return Ok(params);
            }
            self.expect(',')?;
        }
    }

    fn read_record(&mut self, name: String) -> Result<TypeDescriptor> {
        self.expect('{')?;
        let mut record = RecordDescriptor::new(name);
        if self.eat('}') {
            return Ok(record.into_descriptor());
        }
        loop {
            let field = self.read_ident()?.to_string();
            self.expect(':')?;
            let descriptor = self.read_type()?;
            record = record.field(FieldDescriptor::new(field, descriptor));
            if self.eat('}') {
                return Ok(record.into_descriptor());
            }
            self.expect(',')?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_generics() {
        let d = parse_signature("seq<map<str, map<str, date>>>").unwrap();
        assert_eq!(
            d,
            TypeDescriptor::seq(TypeDescriptor::map(
                TypeDescriptor::str(),
                TypeDescriptor::map(TypeDescriptor::str(), TypeDescriptor::date())
            ))
        );
    }

    #[test]
    fn display_round_trips() {
        for sig in [
            "any",
            "date",
            "seq<int>",
            "map<int,seq<float>>",
            "Point{x:float,y:float,tags:seq<str>}",
            "Empty{}",
        ] {
            let d = parse_signature(sig).unwrap();
            assert_eq!(d.to_string(), sig);
        }
    }

    #[test]
    fn aliases_resolve_to_scalars() {
        assert_eq!(parse_signature("string").unwrap(), TypeDescriptor::str());
        assert_eq!(parse_signature("long").unwrap(), TypeDescriptor::int());
        assert_eq!(
            parse_signature("list<boolean>").unwrap(),
            TypeDescriptor::seq(TypeDescriptor::bool())
        );
    }

    #[test]
    fn bare_container_is_unresolved() {
        let d = parse_signature("map").unwrap();
        assert_eq!(d.to_string(), "map<any,any>");
        assert!(!d.is_resolved());
    }

    #[test]
    fn errors_carry_position() {
        assert_eq!(
            parse_signature("seq<dat>").unwrap_err(),
            CodecError::Signature {
                position: 4,
                message: "unknown type \"dat\"".to_string()
            }
        );
        assert!(matches!(
            parse_signature("map<str>"),
            Err(CodecError::Signature { position: 0, .. })
        ));
        assert!(matches!(
            parse_signature("seq<int> x"),
            Err(CodecError::Signature { position: 9, .. })
        ));
    }
}
