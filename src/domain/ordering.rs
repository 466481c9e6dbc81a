use std::cmp::Ordering;

/// Orders host names label by label starting from the top-level domain.
///
/// Each label compares as a whole, so every name under the same parent stays
/// adjacent. When one name runs out of labels first it sorts first:
/// `example.com` < `a.example.com` < `b.example.com` < `example.org`.
pub fn compare_domains(left: &str, right: &str) -> Ordering {
    left.rsplit('.').cmp(right.rsplit('.'))
}
