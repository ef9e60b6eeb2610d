//! Textual type names: `UInt8`, `FixedString(16)`, `Nullable(Date)`, ...
//!
//! [`split_arguments`] is public so composite families defined in other
//! crates can reuse the same parenthesised-argument rules.

use std::str::FromStr;

use llkv_result::{Error, Result};

use crate::DataType;

/// Split `Family(arg, arg, ...)` into the family name and its raw argument
/// list. A bare name yields `(name, None)`. Commas nested inside inner
/// parentheses do not split.
pub fn split_arguments(text: &str) -> Result<(&str, Option<Vec<&str>>)> {
    let text = text.trim();
    let Some(open) = text.find('(') else {
        return Ok((text, None));
    };
    if !text.ends_with(')') {
        return Err(Error::InvalidArgumentError(format!(
            "unbalanced parentheses in type name '{text}'"
        )));
    }
    let family = text[..open].trim();
    let body = &text[open + 1..text.len() - 1];

    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, ch) in body.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    Error::InvalidArgumentError(format!(
                        "unbalanced parentheses in type name '{text}'"
                    ))
                })?;
            }
            ',' if depth == 0 => {
                args.push(body[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(Error::InvalidArgumentError(format!(
            "unbalanced parentheses in type name '{text}'"
        )));
    }
    let last = body[start..].trim();
    if !(args.is_empty() && last.is_empty()) {
        args.push(last);
    }
    Ok((family, Some(args)))
}

fn single_argument<'a>(family: &str, args: Option<Vec<&'a str>>) -> Result<&'a str> {
    match args.as_deref() {
        Some([one]) if !one.is_empty() => Ok(*one),
        _ => Err(Error::InvalidArgumentError(format!(
            "{family} data type family must have exactly one argument"
        ))),
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let (family, args) = split_arguments(text)?;
        let parametric = matches!(family, "FixedString" | "Nullable" | "Array");
        if !parametric && args.is_some() {
            return Err(Error::InvalidArgumentError(format!(
                "{family} data type family takes no arguments"
            )));
        }
        match family {
            "UInt8" => Ok(DataType::UInt8),
            "UInt16" => Ok(DataType::UInt16),
            "UInt32" => Ok(DataType::UInt32),
            "UInt64" => Ok(DataType::UInt64),
            "Int8" => Ok(DataType::Int8),
            "Int16" => Ok(DataType::Int16),
            "Int32" => Ok(DataType::Int32),
            "Int64" => Ok(DataType::Int64),
            "Float32" => Ok(DataType::Float32),
            "Float64" => Ok(DataType::Float64),
            "String" => Ok(DataType::String),
            "Date" => Ok(DataType::Date),
            "DateTime" => Ok(DataType::DateTime),
            "FixedString" => {
                let arg = single_argument(family, args)?;
                let n = arg.parse::<usize>().map_err(|_| {
                    Error::InvalidArgumentError(format!(
                        "FixedString width must be a positive integer, got '{arg}'"
                    ))
                })?;
                if n == 0 {
                    return Err(Error::InvalidArgumentError(
                        "FixedString width must be a positive integer, got '0'".into(),
                    ));
                }
                Ok(DataType::FixedString(n))
            }
            "Nullable" => {
                let inner = single_argument(family, args)?.parse::<DataType>()?;
                Ok(DataType::nullable(inner))
            }
            "Array" => {
                let inner = single_argument(family, args)?.parse::<DataType>()?;
                Ok(DataType::array(inner))
            }
            other => Err(Error::InvalidArgumentError(format!(
                "unknown data type family '{other}'"
            ))),
        }
    }
}
