use crate::codec::value::{Value, ValueCodec};
use crate::core::error::{Error, ErrorKind, Result};
use crate::filter::filter::{Filter, NumericKind, NumericRange, TermRange};
use crate::query::ast::TermOperator;
use crate::query::builders::ResolvedField;
use crate::schema::property::FieldEncoding;

/// Range endpoints before encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds<'a> {
    pub lower: Option<&'a str>,
    pub upper: Option<&'a str>,
    pub include_lower: bool,
    pub include_upper: bool,
}

impl<'a> Bounds<'a> {
    /// Inclusivity per operator; the flag on the open side has no effect.
    pub fn for_operator(op: TermOperator, value: &'a str) -> Result<Self> {
        let bounds = match op {
            TermOperator::Ge => Bounds { lower: Some(value), upper: None, include_lower: true, include_upper: true },
            TermOperator::Gt => Bounds { lower: Some(value), upper: None, include_lower: false, include_upper: true },
            TermOperator::Le => Bounds { lower: None, upper: Some(value), include_lower: true, include_upper: true },
            TermOperator::Lt => Bounds { lower: None, upper: Some(value), include_lower: true, include_upper: false },
            _ => return Err(Error::unsupported_operator(op, "range")),
        };
        Ok(bounds)
    }

    pub fn between(lower: Option<&'a str>, upper: Option<&'a str>, inclusive: bool) -> Self {
        Bounds {
            lower,
            upper,
            include_lower: inclusive,
            include_upper: inclusive,
        }
    }
}

pub fn build_one_sided(field: &ResolvedField, op: TermOperator, value: &str) -> Result<Filter> {
    build(field, Bounds::for_operator(op, value)?)
}

/// Numeric and date types become int/long ranges, the rest byte-lexical term ranges.
pub fn build(field: &ResolvedField, bounds: Bounds) -> Result<Filter> {
    if bounds.lower.is_none() && bounds.upper.is_none() {
        return Err(Error::new(
            ErrorKind::MissingBound,
            format!("range on {} has neither lower nor upper bound", field.name),
        ));
    }

    let filter = match field.encoding() {
        FieldEncoding::Text => {
            if !field.property_type.supports_lexical_range() {
                return Err(Error::unsupported_value_type(format!(
                    "range on {} property {}",
                    field.property_type, field.name
                )));
            }
            let encode = |literal: &str| ValueCodec::encode_literal(field.property_type, literal);
            Filter::TermRange(TermRange {
                field: field.name.clone(),
                lower: bounds.lower.map(encode).transpose()?,
                upper: bounds.upper.map(encode).transpose()?,
                include_lower: bounds.include_lower,
                include_upper: bounds.include_upper,
            })
        }
        FieldEncoding::Int | FieldEncoding::Long => {
            let kind = match field.encoding() {
                FieldEncoding::Int => NumericKind::Int,
                _ => NumericKind::Long,
            };
            let numeric = |literal: &str| numeric_bound(field, literal);
            Filter::NumericRange(NumericRange {
                field: field.name.clone(),
                kind,
                lower: bounds.lower.map(numeric).transpose()?,
                upper: bounds.upper.map(numeric).transpose()?,
                include_lower: bounds.include_lower,
                include_upper: bounds.include_upper,
            })
        }
    };

    Ok(filter)
}

fn numeric_bound(field: &ResolvedField, literal: &str) -> Result<i64> {
    match ValueCodec::parse(field.property_type, literal)? {
        Value::Int(v) => Ok(v as i64),
        other => other.as_long().ok_or_else(|| {
            Error::unsupported_value_type(format!("{:?} is not numeric", other))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ast::FieldRef;
    use crate::schema::property::{PropertyType, PropertyTypeDefinition};

    fn field(property_type: PropertyType) -> ResolvedField {
        ResolvedField::resolve(&FieldRef::property(PropertyTypeDefinition::new("p", property_type))).unwrap()
    }

    #[test]
    fn boundary_table() {
        let cases = [
            (TermOperator::Ge, Some("5"), None, true, true),
            (TermOperator::Gt, Some("5"), None, false, true),
            (TermOperator::Le, None, Some("5"), true, true),
            (TermOperator::Lt, None, Some("5"), true, false),
        ];
        for (op, lower, upper, include_lower, include_upper) in cases {
            assert_eq!(
                Bounds::for_operator(op, "5").unwrap(),
                Bounds { lower, upper, include_lower, include_upper },
                "operator {}",
                op
            );
        }
        assert_eq!(
            Bounds::for_operator(TermOperator::Eq, "5").unwrap_err().kind,
            ErrorKind::UnsupportedOperator
        );
    }

    #[test]
    fn missing_bounds() {
        let err = build(&field(PropertyType::Long), Bounds::between(None, None, true)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingBound);
    }

    #[test]
    fn dates_become_long_ranges() {
        let filter = build(
            &field(PropertyType::Date),
            Bounds::between(Some("1970-01-01 00:00:01"), Some("1970-01-01 00:00:02"), false),
        )
        .unwrap();
        assert_eq!(
            filter,
            Filter::NumericRange(NumericRange {
                field: "p_p".into(),
                kind: NumericKind::Long,
                lower: Some(1000),
                upper: Some(2000),
                include_lower: false,
                include_upper: false,
            })
        );
    }

    #[test]
    fn strings_become_term_ranges() {
        let filter = build_one_sided(&field(PropertyType::String), TermOperator::Lt, "m").unwrap();
        assert_eq!(
            filter,
            Filter::TermRange(TermRange {
                field: "p_p".into(),
                lower: None,
                upper: Some(b"m".to_vec()),
                include_lower: true,
                include_upper: false,
            })
        );
    }

    #[test]
    fn markup_has_no_range_encoding() {
        for property_type in [PropertyType::Html, PropertyType::Json, PropertyType::ImageRef] {
            let err = build_one_sided(&field(property_type), TermOperator::Ge, "a").unwrap_err();
            assert_eq!(err.kind, ErrorKind::UnsupportedValueType);
        }
    }
}
