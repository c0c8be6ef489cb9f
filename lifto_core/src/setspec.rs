//! Set list parser.
//!
//! Grammar, whitespace-insensitive except between reps and weight:
//!
//! ```text
//! SetList  := SetGroup (',' SetGroup)*
//! SetGroup := Count ('x' | 'X') Reps [Weight]
//! Reps     := N | N '+' | N '-' M
//! Weight   := Number '%' | Number [ 'lb' | 'lbs' | 'kg' ]
//! ```

use crate::{Error, Reps, Result, SetSpec, WeightExpr, WeightUnit};

/// Largest set count one group may ask for
pub const MAX_SETS_PER_GROUP: u32 = 100;

/// Parse the text after the `/` of an exercise line.
///
/// `line` and `text` identify the source line for error messages.
pub fn parse_set_list(line: usize, text: &str, list: &str) -> Result<Vec<SetSpec>> {
    let list = list.trim();
    if list.is_empty() {
        return Err(Error::parse(line, text, "/", "missing set list after `/`"));
    }

    list.split(',')
        .map(|group| parse_set_group(line, text, group))
        .collect()
}

/// Parse one `NxR [weight]` group.
pub fn parse_set_group(line: usize, text: &str, group: &str) -> Result<SetSpec> {
    let group = group.trim();
    if group.is_empty() {
        return Err(Error::parse(line, text, ",", "empty set group"));
    }

    let mut tokens = group.split_whitespace();
    let shape = tokens.next().unwrap_or_default();
    let weight_token = tokens.next();
    if let Some(extra) = tokens.next() {
        return Err(Error::parse(
            line,
            text,
            extra,
            "unexpected token after weight",
        ));
    }

    let (count_text, reps_text) = shape
        .split_once(['x', 'X'])
        .ok_or_else(|| Error::parse(line, text, shape, "missing `x` between sets and reps"))?;

    if count_text.is_empty() || !count_text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::parse(
            line,
            text,
            shape,
            format!("set count `{}` is not a whole number", count_text),
        ));
    }
    // Digits only, so a parse failure here is overflow
    let count = match count_text.parse::<u32>() {
        Ok(0) => {
            return Err(Error::parse(line, text, shape, "set count must be at least 1"));
        }
        Ok(n) if n <= MAX_SETS_PER_GROUP => n,
        _ => {
            return Err(Error::parse(
                line,
                text,
                shape,
                format!("set count must be at most {}", MAX_SETS_PER_GROUP),
            ));
        }
    };

    let reps: Reps = reps_text
        .parse()
        .map_err(|reason: String| Error::parse(line, text, shape, reason))?;

    let weight = weight_token
        .map(|token| parse_weight(line, text, token))
        .transpose()?;

    Ok(SetSpec {
        count,
        reps,
        weight,
    })
}

/// Parse a weight token: `65%`, `135`, `135lb`, `60kg`.
pub fn parse_weight(line: usize, text: &str, token: &str) -> Result<WeightExpr> {
    if let Some(percent) = token.strip_suffix('%') {
        let value = parse_amount(line, text, token, percent)?;
        return Ok(WeightExpr::Percent(value));
    }

    let split = token
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(token.len());
    let (number, suffix) = token.split_at(split);

    let unit = if suffix.is_empty() {
        None
    } else {
        let unit: WeightUnit = suffix
            .parse()
            .map_err(|reason: String| Error::parse(line, text, token, reason))?;
        Some(unit)
    };

    let value = parse_amount(line, text, token, number)?;
    Ok(WeightExpr::Absolute { value, unit })
}

fn parse_amount(line: usize, text: &str, token: &str, number: &str) -> Result<f64> {
    let value: f64 = number.parse().map_err(|_| {
        Error::parse(line, text, token, format!("`{}` is not a number", number))
    })?;

    if !value.is_finite() || value < 0.0 {
        return Err(Error::parse(
            line,
            text,
            token,
            "weight must be a non-negative number",
        ));
    }
    Ok(value)
}
