/// Fixed number of results per page
pub const PAGE_SIZE: u32 = 25;

/// Number of pages needed to show `total` results
#[inline]
pub fn page_count(total: u64) -> u32 {
    let pages = total.div_ceil(PAGE_SIZE as u64);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Result offset of the first record on a 1-based page
#[inline]
pub fn offset_for_page(page: u32) -> u64 {
    (page.max(1) as u64 - 1) * PAGE_SIZE as u64
}

/// A pagination control is only offered when results spill past one page
#[inline]
pub fn shows_pagination(total: u64) -> bool {
    total > PAGE_SIZE as u64
}

/// Clamp a requested page into `1..=page_count(total)`
///
/// A zero total still has a page 1.
#[inline]
pub fn clamp_page(page: u32, total: u64) -> u32 {
    page.clamp(1, page_count(total).max(1))
}
