use crate::defaults::MAX_BAND_INDEX;
use crate::error::{Result, TdmError};

/// Parses band ranges of the form `N`, `N:M` or `N:M:S` (inclusive, step S defaults to 1)
/// and concatenates the bands of all tokens in the given order. Tokens may also be
/// separated by whitespace or commas within a single string.
pub fn parse_band_ranges<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<usize>> {
    let mut bands: Vec<usize> = Vec::new();
    for token in tokens
        .iter()
        .flat_map(|t| t.as_ref().split(|c: char| c.is_whitespace() || c == ','))
        .filter(|t| !t.is_empty())
    {
        bands.extend(parse_token(token)?);
    }
    Ok(bands)
}

fn parse_token(token: &str) -> Result<Vec<usize>> {
    let error = |reason: &str| TdmError::InvalidRangeSyntax {
        token: token.to_owned(),
        reason: reason.to_owned(),
    };
    let fields: Vec<usize> = token
        .split(':')
        .map(|field| field.trim().parse::<usize>())
        .collect::<std::result::Result<Vec<usize>, _>>()
        .map_err(|_| error("expected positive integers in the form N, N:M or N:M:S"))?;

    let (start, end, step): (usize, usize, usize) = match fields.as_slice() {
        [n] => (*n, *n, 1),
        [n, m] => (*n, *m, 1),
        [n, m, s] => (*n, *m, *s),
        _ => return Err(error("too many fields, expected N, N:M or N:M:S")),
    };
    if start == 0 {
        return Err(error("band indices start at 1"));
    }
    if step == 0 {
        return Err(error("the step must be at least 1"));
    }
    if end < start {
        return Err(error("the end of the range is below its start"));
    }
    if end > MAX_BAND_INDEX {
        return Err(error(&format!(
            "band indices above {} are not supported",
            MAX_BAND_INDEX
        )));
    }
    Ok((start..=end).step_by(step).collect())
}
