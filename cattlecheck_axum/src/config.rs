use std::sync::LazyLock;

/// Page size for the admin report listing when none is given
pub(crate) static ADMIN_DEFAULT_PAGE_LIMIT: LazyLock<u32> = LazyLock::new(|| {
    std::env::var("ADMIN_DEFAULT_PAGE_LIMIT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(20)
});

/// Room for multipart framing on top of the image ceiling
pub(crate) const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;
