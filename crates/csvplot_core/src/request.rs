//! Form input to `PlotRequest` shaping.
//!
//! The form is loosely typed: every field is the raw text the user typed. How an
//! unparsable range or a skip count below one is treated is chosen through
//! [`RequestPolicy`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TITLE: &str = "Scatter Plot from CSV";
pub const DEFAULT_SIZE: &str = "768x512";

/// Raw form state as edited by the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormFields {
    pub columns: String,
    pub title: String,
    pub size: String,
    pub max_range: String,
    pub skip: String,
    pub xdata: bool,
    pub xscale: String,
}

/// How an unparsable `maxRange` field is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MaxRangePolicy {
    /// Unparsable input means "no upper bound".
    #[default]
    AbsentWhenUnparsable,
    /// Unparsable input is sent as `0`.
    ZeroWhenUnparsable,
}

/// How the `skip` field is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SkipPolicy {
    /// Unparsable input becomes 1, values below 1 are raised to 1.
    #[default]
    Clamp,
    /// Unparsable input becomes 1, a parsed value below 1 fails validation.
    DefaultThenReject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestPolicy {
    pub max_range: MaxRangePolicy,
    pub skip: SkipPolicy,
    pub default_title: String,
    pub default_size: String,
}

impl Default for RequestPolicy {
    fn default() -> Self {
        Self {
            max_range: MaxRangePolicy::default(),
            skip: SkipPolicy::default(),
            default_title: DEFAULT_TITLE.to_string(),
            default_size: DEFAULT_SIZE.to_string(),
        }
    }
}

/// Validated request sent to the computation backend.
///
/// Field names on the wire are fixed by the backend contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotRequest {
    columns: Vec<String>,
    title: String,
    size: String,
    max_range: Option<f64>,
    skip: u32,
    xdata: bool,
    xscale: Option<String>,
}

impl PlotRequest {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn max_range(&self) -> Option<f64> {
        self.max_range
    }

    pub fn skip(&self) -> u32 {
        self.skip
    }

    pub fn xdata(&self) -> bool {
        self.xdata
    }

    pub fn xscale(&self) -> Option<&str> {
        self.xscale.as_deref()
    }

    /// Serializes the request into the options JSON expected by the backend.
    pub fn to_options_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no columns to plot were specified")]
    NoColumns,
    #[error("skip must be at least 1 (got {0})")]
    SkipBelowOne(i64),
}

/// Builds a validated request from raw form fields.
pub fn build_request(
    form: &FormFields,
    policy: &RequestPolicy,
) -> Result<PlotRequest, ValidationError> {
    let columns = parse_columns(&form.columns);
    if columns.is_empty() {
        return Err(ValidationError::NoColumns);
    }

    Ok(PlotRequest {
        columns,
        title: or_default(&form.title, &policy.default_title),
        size: or_default(&form.size, &policy.default_size),
        max_range: resolve_max_range(&form.max_range, policy.max_range),
        skip: resolve_skip(&form.skip, policy.skip)?,
        xdata: form.xdata,
        xscale: non_blank(&form.xscale),
    })
}

fn parse_columns(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|column| !column.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn or_default(raw: &str, default: &str) -> String {
    non_blank(raw).unwrap_or_else(|| default.to_string())
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn resolve_max_range(raw: &str, policy: MaxRangePolicy) -> Option<f64> {
    // Infinite prefixes such as "1e999" cannot be sent as JSON numbers.
    let parsed = leading_float(raw).filter(|v| v.is_finite());
    match (parsed, policy) {
        (Some(value), _) => Some(value),
        (None, MaxRangePolicy::AbsentWhenUnparsable) => None,
        (None, MaxRangePolicy::ZeroWhenUnparsable) => Some(0.0),
    }
}

fn resolve_skip(raw: &str, policy: SkipPolicy) -> Result<u32, ValidationError> {
    let Some(parsed) = leading_int(raw) else {
        return Ok(1);
    };
    if parsed >= 1 {
        return Ok(u32::try_from(parsed).unwrap_or(u32::MAX));
    }
    match policy {
        SkipPolicy::Clamp => Ok(1),
        SkipPolicy::DefaultThenReject => Err(ValidationError::SkipBelowOne(parsed)),
    }
}

/// Number of ASCII digits starting at `start`.
fn digit_run(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count()
}

fn sign_len(bytes: &[u8]) -> usize {
    usize::from(matches!(bytes.first(), Some(b'+' | b'-')))
}

/// Parses the longest numeric prefix after leading whitespace, so "100px" reads as 100.
fn leading_float(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let mut end = sign_len(bytes);
    let int_digits = digit_run(bytes, end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digit_run(bytes, end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exp_start = end + 1;
        let exp_sign = sign_len(&bytes[exp_start..]);
        let exp_digits = digit_run(bytes, exp_start + exp_sign);
        if exp_digits > 0 {
            end = exp_start + exp_sign + exp_digits;
        }
    }
    text[..end].parse().ok()
}

/// Parses a leading integer after whitespace; "2.5" reads as 2, "3abc" as 3.
fn leading_int(raw: &str) -> Option<i64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let sign = sign_len(bytes);
    let digits = digit_run(bytes, sign);
    if digits == 0 {
        return None;
    }
    let saturated = if bytes[0] == b'-' { i64::MIN } else { i64::MAX };
    Some(text[..sign + digits].parse().unwrap_or(saturated))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_trimmed_and_blank_tokens_dropped() {
        assert_eq!(parse_columns(" a, ,b ,,"), vec!["a", "b"]);
        assert!(parse_columns(" , ,").is_empty());
    }

    #[test]
    fn non_finite_range_is_treated_as_unparsable() {
        assert_eq!(resolve_max_range("NaN", MaxRangePolicy::AbsentWhenUnparsable), None);
        assert_eq!(resolve_max_range("inf", MaxRangePolicy::ZeroWhenUnparsable), Some(0.0));
        assert_eq!(resolve_max_range("1e999", MaxRangePolicy::AbsentWhenUnparsable), None);
        assert_eq!(resolve_max_range(" 2.5 ", MaxRangePolicy::AbsentWhenUnparsable), Some(2.5));
    }

    #[test]
    fn huge_skip_saturates() {
        assert_eq!(resolve_skip("99999999999", SkipPolicy::Clamp), Ok(u32::MAX));
    }

    #[test]
    fn numeric_prefixes_are_accepted() {
        assert_eq!(leading_float("100px"), Some(100.0));
        assert_eq!(leading_float("  -.5e2x"), Some(-50.0));
        assert_eq!(leading_float("1e"), Some(1.0));
        assert_eq!(leading_float("."), None);
        assert_eq!(leading_float("px100"), None);
        assert_eq!(leading_int("2.5"), Some(2));
        assert_eq!(leading_int(" 3abc"), Some(3));
        assert_eq!(leading_int("-4"), Some(-4));
        assert_eq!(leading_int("abc"), None);
        assert_eq!(leading_int("-99999999999999999999"), Some(i64::MIN));
    }
}
