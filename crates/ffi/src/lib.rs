// ABOUTME: C FFI bindings for the embedguard video embed resolver.
// ABOUTME: Exposes arena-allocated sanitize, allowlist, embed URL, and resolve results to native callers.

use std::panic;
use std::ptr;

use bumpalo::Bump;
use embedguard_resolver::{
    build_embed_url, is_allowed_video_platform, sanitize_video_url, EmbedError, EmbedParameters,
    ResolvedEmbed, Resolver,
};
use once_cell::sync::Lazy;

/// Builtin-allowlist resolver shared by every `embedguard_resolve` call.
static RESOLVER: Lazy<Resolver> = Lazy::new(Resolver::default);

/// FFI version constant for ABI compatibility checking.
pub const EMBEDGUARD_FFI_VERSION: u32 = 1;

/// Returns the FFI ABI version number.
/// Consumers should check this matches their expected version.
#[no_mangle]
pub extern "C" fn embedguard_ffi_version() -> u32 {
    EMBEDGUARD_FFI_VERSION
}

// ----------------------------------------------------------------------------
// Error handling
// ----------------------------------------------------------------------------

/// Error codes matching the C ABI DErrorCode enum.
#[repr(u32)]
pub enum DErrorCode {
    Ok = 0,
    Invalid = 1,
    NotAllowed = 2,
    Internal = 255,
}

/// UTF-8 string slice for FFI. Not null-terminated.
/// Consumer must not mutate or free; memory owned by arena.
#[derive(Copy, Clone)]
#[repr(C)]
pub struct DString {
    pub data: *const u8,
    pub len: usize,
}

impl DString {
    /// Creates an empty DString with null pointer and zero length.
    pub const fn empty() -> Self {
        DString {
            data: ptr::null(),
            len: 0,
        }
    }
}

impl Default for DString {
    fn default() -> Self {
        Self::empty()
    }
}

/// FFI error struct matching C ABI DError.
#[repr(C)]
pub struct DError {
    pub code: u32,
    pub message: DString,
}

impl DError {
    /// Creates a success (D_OK) error with empty message.
    pub const fn ok() -> Self {
        DError {
            code: DErrorCode::Ok as u32,
            message: DString::empty(),
        }
    }
}

// ----------------------------------------------------------------------------
// DEmbedView - matches C ABI struct
// ----------------------------------------------------------------------------

#[repr(C)]
pub struct DEmbedView {
    pub embed_url: DString,
    pub provider: DString,
    pub iframe_embeddable: bool,
    pub title: DString,
    pub class_name: DString,
    pub frame_border: DString,
    pub allow: DString,
    pub allow_full_screen: bool,
    pub sandbox: DString,
    pub loading: DString,
}

// ----------------------------------------------------------------------------
// Arena types
// ----------------------------------------------------------------------------

/// Arena holding a single string result (sanitized URL or embed URL).
pub struct DStringArena {
    #[allow(dead_code)]
    bump: Bump,
    value: DString,
}

/// Arena holding a resolved embed view.
pub struct DEmbedArena {
    #[allow(dead_code)]
    bump: Bump,
    view: *const DEmbedView,
}

// ----------------------------------------------------------------------------
// Helper functions
// ----------------------------------------------------------------------------

/// Copies a string into the arena and returns a DString pointing to it.
fn copy_str_to_arena(bump: &Bump, s: &str) -> DString {
    if s.is_empty() {
        return DString::empty();
    }
    let bytes = bump.alloc_slice_copy(s.as_bytes());
    DString {
        data: bytes.as_ptr(),
        len: bytes.len(),
    }
}

/// Reads caller bytes as strict UTF-8. A null pointer reads as the empty string.
unsafe fn strict_str<'a>(data: *const u8, len: usize) -> Result<&'a str, std::str::Utf8Error> {
    if data.is_null() || len == 0 {
        return Ok("");
    }
    std::str::from_utf8(std::slice::from_raw_parts(data, len))
}

fn make_string_arena(s: &str) -> *mut DStringArena {
    let bump = Bump::new();
    let value = copy_str_to_arena(&bump, s);
    Box::into_raw(Box::new(DStringArena { bump, value }))
}

/// Creates a DEmbedView in the arena from a ResolvedEmbed.
fn make_embed_view(bump: &Bump, resolved: &ResolvedEmbed) -> *const DEmbedView {
    let attrs = &resolved.attributes;
    let view = bump.alloc(DEmbedView {
        embed_url: copy_str_to_arena(bump, &resolved.result.embed_url),
        provider: copy_str_to_arena(bump, resolved.result.provider.as_str()),
        iframe_embeddable: resolved.result.provider.is_iframe_embeddable(),
        title: copy_str_to_arena(bump, &attrs.title),
        class_name: copy_str_to_arena(bump, &attrs.class_name),
        frame_border: copy_str_to_arena(bump, &attrs.frame_border),
        allow: copy_str_to_arena(bump, &attrs.allow),
        allow_full_screen: attrs.allow_full_screen,
        sandbox: copy_str_to_arena(bump, &attrs.sandbox),
        loading: copy_str_to_arena(bump, &attrs.loading),
    });
    view as *const DEmbedView
}

/// Maps an EmbedError to a DErrorCode and a static message.
fn map_error(err: &EmbedError) -> (u32, &'static str) {
    match err {
        EmbedError::Empty => (DErrorCode::Invalid as u32, "video url is empty"),
        EmbedError::NotAllowed(_) => (
            DErrorCode::NotAllowed as u32,
            "video url is not from an allowed platform",
        ),
        EmbedError::Config(_) => (DErrorCode::Internal as u32, "invalid resolver config"),
    }
}

/// Sets the out_err with the given code and message.
/// Messages are static, so they stay valid after the call returns.
/// If out_err is null, this is a no-op.
unsafe fn set_error(out_err: *mut DError, code: u32, message: &'static str) {
    if !out_err.is_null() {
        (*out_err).code = code;
        (*out_err).message = DString {
            data: message.as_ptr(),
            len: message.len(),
        };
    }
}

/// Sets out_err to success (D_OK with empty message).
/// If out_err is null, this is a no-op.
unsafe fn set_success(out_err: *mut DError) {
    if !out_err.is_null() {
        (*out_err).code = DErrorCode::Ok as u32;
        (*out_err).message = DString::empty();
    }
}

// ----------------------------------------------------------------------------
// String FFI functions
// ----------------------------------------------------------------------------

/// Sanitizes a URL. A null input or invalid UTF-8 yields an empty string, so
/// the output is never longer than the input.
///
/// # Returns
/// Pointer to DStringArena, or null if an internal panic was caught.
///
/// # Safety
/// `url` must point to `url_len` readable bytes or be null.
/// Caller must free the returned arena via embedguard_free_string.
#[no_mangle]
pub unsafe extern "C" fn embedguard_sanitize(url: *const u8, url_len: usize) -> *mut DStringArena {
    let input = strict_str(url, url_len).unwrap_or("");
    match panic::catch_unwind(|| sanitize_video_url(input)) {
        Ok(sanitized) => make_string_arena(&sanitized),
        Err(_) => ptr::null_mut(),
    }
}

/// Checks a URL against the builtin allowlist. A null input or invalid UTF-8 is never allowed.
///
/// # Safety
/// `url` must point to `url_len` readable bytes or be null.
#[no_mangle]
pub unsafe extern "C" fn embedguard_is_allowed(url: *const u8, url_len: usize) -> bool {
    match strict_str(url, url_len) {
        Ok(input) => panic::catch_unwind(|| is_allowed_video_platform(input)).unwrap_or(false),
        Err(_) => false,
    }
}

/// Builds an embed URL (no allowlist gate). Unmatched input is returned unchanged;
/// invalid UTF-8 yields an empty string.
///
/// # Safety
/// `url` must point to `url_len` readable bytes or be null.
/// Caller must free the returned arena via embedguard_free_string.
#[no_mangle]
pub unsafe extern "C" fn embedguard_embed_url(
    url: *const u8,
    url_len: usize,
    autoplay: bool,
    muted: bool,
    loop_playback: bool,
) -> *mut DStringArena {
    let input = strict_str(url, url_len).unwrap_or("");
    let params = EmbedParameters::new(autoplay, muted, loop_playback);
    match panic::catch_unwind(|| build_embed_url(input, &params)) {
        Ok(embed_url) => make_string_arena(&embed_url),
        Err(_) => ptr::null_mut(),
    }
}

/// Returns the string held by a DStringArena.
///
/// # Safety
/// The arena pointer must be valid or null.
/// The returned view is valid until embedguard_free_string is called.
#[no_mangle]
pub unsafe extern "C" fn embedguard_string_result(arena: *const DStringArena) -> DString {
    if arena.is_null() {
        return DString::empty();
    }
    (*arena).value
}

/// Frees a string arena.
///
/// # Safety
/// The arena pointer must have been returned by one of the string functions.
/// After this call, the arena pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn embedguard_free_string(arena: *mut DStringArena) {
    if !arena.is_null() {
        drop(Box::from_raw(arena));
    }
}

// ----------------------------------------------------------------------------
// Resolve FFI functions
// ----------------------------------------------------------------------------

/// Runs the full sanitize, allowlist, and embed pipeline with the builtin allowlist.
///
/// # Arguments
/// * `url` - URL bytes (UTF-8)
/// * `url_len` - Length of URL in bytes
/// * `title` - Iframe title bytes (UTF-8, may be null)
/// * `title_len` - Length of title in bytes
/// * `autoplay`, `muted`, `loop_playback` - Playback flags
/// * `out_err` - Output error struct (may be null)
///
/// # Returns
/// Pointer to DEmbedArena on success, null on failure.
/// On failure, out_err (if non-null) contains error details.
///
/// # Safety
/// Caller must free the returned arena via embedguard_free_embed.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn embedguard_resolve(
    url: *const u8,
    url_len: usize,
    title: *const u8,
    title_len: usize,
    autoplay: bool,
    muted: bool,
    loop_playback: bool,
    out_err: *mut DError,
) -> *mut DEmbedArena {
    let url_str = match strict_str(url, url_len) {
        Ok(s) => s,
        Err(_) => {
            set_error(
                out_err,
                DErrorCode::Invalid as u32,
                "url is not valid UTF-8",
            );
            return ptr::null_mut();
        }
    };
    let title_str = match strict_str(title, title_len) {
        Ok(s) => s,
        Err(_) => {
            set_error(
                out_err,
                DErrorCode::Invalid as u32,
                "title is not valid UTF-8",
            );
            return ptr::null_mut();
        }
    };

    let params = EmbedParameters::new(autoplay, muted, loop_playback);

    // Catch panics to avoid unwinding across FFI boundary
    let result = panic::catch_unwind(|| RESOLVER.resolve(url_str, Some(&params), title_str));

    match result {
        Ok(Ok(resolved)) => {
            let bump = Bump::new();
            let view = make_embed_view(&bump, &resolved);
            let arena = Box::new(DEmbedArena { bump, view });
            set_success(out_err);
            Box::into_raw(arena)
        }
        Ok(Err(err)) => {
            let (code, message) = map_error(&err);
            set_error(out_err, code, message);
            ptr::null_mut()
        }
        Err(_) => {
            set_error(
                out_err,
                DErrorCode::Internal as u32,
                "internal panic during resolve",
            );
            ptr::null_mut()
        }
    }
}

/// Returns a pointer to the DEmbedView inside the arena.
///
/// # Safety
/// The arena pointer must be valid and non-null.
/// The returned pointer is valid until embedguard_free_embed is called.
#[no_mangle]
pub unsafe extern "C" fn embedguard_embed_result(arena: *const DEmbedArena) -> *const DEmbedView {
    if arena.is_null() {
        return ptr::null();
    }
    (*arena).view
}

/// Frees the embed arena and all associated allocations.
///
/// # Safety
/// The arena pointer must be valid and must have been returned by embedguard_resolve.
/// After this call, the arena pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn embedguard_free_embed(arena: *mut DEmbedArena) {
    if !arena.is_null() {
        drop(Box::from_raw(arena));
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
