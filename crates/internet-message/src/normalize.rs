/// Returns the offset of the first CR that is not followed by LF,
/// or of the first LF that is not preceded by CR.
pub fn find_lone_cr_or_lf(data: &[u8]) -> Option<usize> {
    memchr::memchr2_iter(b'\r', b'\n', data).find(|&i| match data[i] {
        b'\r' => data.get(i + 1).copied() != Some(b'\n'),
        _ => i == 0 || data[i - 1] != b'\r',
    })
}

pub fn has_lone_cr_or_lf(data: &[u8]) -> bool {
    find_lone_cr_or_lf(data).is_some()
}

/// Rewrites every lone CR and lone LF as CRLF, so that the result
/// satisfies the line terminator rules enforced by the parser.
pub fn normalize_crlf(data: &[u8]) -> Vec<u8> {
    let mut normalized = Vec::with_capacity(data.len());
    let mut last_idx = 0;

    for i in memchr::memchr2_iter(b'\r', b'\n', data) {
        if data[i] == b'\r' {
            normalized.extend_from_slice(&data[last_idx..=i]);
            if data.get(i + 1).copied() != Some(b'\n') {
                normalized.push(b'\n');
            }
        } else {
            normalized.extend_from_slice(&data[last_idx..i]);
            if i == 0 || data[i - 1] != b'\r' {
                normalized.push(b'\r');
            }
            normalized.push(b'\n');
        }
        last_idx = i + 1;
    }

    normalized.extend_from_slice(&data[last_idx..]);
    normalized
}
