// The host calls into this library from C and trusts the pointers it passes.
// Safety contracts are documented per function.
#![allow(clippy::missing_safety_doc)]

// lemmatize-ffi: token filter plugin ABI for search daemons.
//
// Install the built library as `lemmatize_uk.so`; the daemon finds the
// library-level entry points by that prefix and the token filter by the
// `luk` name given in the index configuration:
//
//   index_token_filter = lemmatize_uk.so:luk:overlong=truncate
//
// Call order as driven by the host:
//   lemmatize_uk_ver, lemmatize_uk_setlogcb   once, after dlopen
//   plugin_load                               once; failure aborts loading
//   luk_init ... luk_deinit                   once per tokenization stream
//     luk_push_token, luk_get_extra_token*    per raw token
//   plugin_unload                             once, before dlclose
//
// Memory rules:
// - `luk_init` stores a boxed session in `*userdata`; `luk_deinit` frees it.
// - Tokens returned by push/extra either are the caller's own input pointer
//   (pass-through) or point into the session's buffer, valid until the next
//   call on the same session. The caller never frees them.
// - Incoming tokens are read up to MAX_TOKEN_LEN bytes, never further.

use std::ffi::{CString, c_char, c_int, c_void};
use std::ptr;
use std::slice;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use lemmatize_core::token::clip;
use lemmatize_core::{InitError, MAX_TOKEN_LEN};
use lemmatize_uk::logging::{self, LogSink};
use lemmatize_uk::{Config, Emit, EngineHandle, EngineSlot, Ownership, OverlongPolicy, Session, engine};

/// Plugin interface version this library was built against.
pub const SPH_UDF_VERSION: c_int = 22;

/// Size of the host's error message buffer, terminator included.
pub const SPH_UDF_ERROR_LEN: usize = 256;

/// Host logging callback: message and its length, or -1 if NUL-terminated.
pub type SphinxLogFn = unsafe extern "C" fn(message: *const c_char, len: c_int);

type PluginSession = Session<EngineHandle<'static>>;

static ENGINE: EngineSlot = EngineSlot::new();

/// Set when this library's `plugin_load` brought the engine up.
static OWNS_ENGINE: AtomicBool = AtomicBool::new(false);

/// Configuration captured at load time; sessions start from it.
static CONFIG: RwLock<Option<Config>> = RwLock::new(None);

// ── Library entry points ────────────────────────────────────────

/// Report the plugin interface version.
#[unsafe(no_mangle)]
pub extern "C" fn lemmatize_uk_ver() -> c_int {
    SPH_UDF_VERSION
}

/// Register the daemon's logging callback. NULL unregisters it.
#[unsafe(no_mangle)]
pub extern "C" fn lemmatize_uk_setlogcb(callback: Option<SphinxLogFn>) {
    let sink = callback.map(|callback| -> LogSink {
        Box::new(move |message: &str| {
            let Ok(message) = CString::new(message.replace('\0', " ")) else {
                return;
            };
            // SAFETY: the daemon keeps the callback valid while the library
            // is loaded; the message is NUL-terminated.
            unsafe { callback(message.as_ptr(), -1) };
        })
    });
    logging::set_sink(sink);
}

/// Bring up the analysis engine.
///
/// Returns 0 on success. On failure returns 1 and writes a message into
/// `error_message`, which must point to `SPH_UDF_ERROR_LEN` writable bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn plugin_load(error_message: *mut c_char) -> c_int {
    match Config::from_env().and_then(load) {
        Ok(()) => 0,
        Err(e) => {
            log::error!("plugin load failed: {e}");
            write_error(error_message, &e.to_string());
            1
        }
    }
}

/// Tear down the engine if `plugin_load` brought it up. Always returns 0.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn plugin_unload(_error_message: *mut c_char) -> c_int {
    unload();
    0
}

fn load(config: Config) -> Result<(), InitError> {
    logging::set_level(config.log_level);
    let ownership = ENGINE.load_with(|| engine::start(&config))?;
    if ownership == Ownership::Owner {
        OWNS_ENGINE.store(true, Ordering::SeqCst);
    }
    match CONFIG.write() {
        Ok(mut slot) => *slot = Some(config),
        Err(poisoned) => *poisoned.into_inner() = Some(config),
    }
    Ok(())
}

fn unload() {
    if OWNS_ENGINE.swap(false, Ordering::SeqCst) {
        ENGINE.unload(Ownership::Owner);
    }
}

fn session_config(options: &str) -> Result<Config, InitError> {
    let mut config = CONFIG
        .read()
        .ok()
        .and_then(|c| c.clone())
        .unwrap_or_default();
    config.apply_options(options)?;
    Ok(config)
}

// ── Token filter `luk` ──────────────────────────────────────────

/// Create a session for one tokenization stream.
///
/// `options` is the filter's option string from the index configuration
/// (may be NULL). Returns 0 on success; on failure returns 1 and fills
/// `error_message`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn luk_init(
    userdata: *mut *mut c_void,
    _num_fields: c_int,
    _field_names: *const *const c_char,
    options: *const c_char,
    error_message: *mut c_char,
) -> c_int {
    if userdata.is_null() {
        write_error(error_message, "userdata pointer is null");
        return 1;
    }

    let options = if options.is_null() {
        ""
    } else {
        match unsafe { std::ffi::CStr::from_ptr(options) }.to_str() {
            Ok(s) => s,
            Err(_) => {
                write_error(error_message, "options are not valid UTF-8");
                return 1;
            }
        }
    };

    let config = match session_config(options) {
        Ok(c) => c,
        Err(e) => {
            write_error(error_message, &e.to_string());
            return 1;
        }
    };

    let session: Box<PluginSession> = Box::new(Session::with_policy(ENGINE.handle(), config.overlong));
    unsafe { *userdata = Box::into_raw(session).cast() };
    0
}

/// Destroy a session created by `luk_init`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn luk_deinit(userdata: *mut c_void) {
    if !userdata.is_null() {
        drop(unsafe { Box::from_raw(userdata.cast::<PluginSession>()) });
    }
}

/// Push a raw token.
///
/// Returns the token to index in its place and stores in `*extra` how many
/// further tokens `luk_get_extra_token` will produce. Unanalyzable tokens
/// come back as the `token` pointer itself with `*extra = 0`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn luk_push_token(
    userdata: *mut c_void,
    token: *mut c_char,
    extra: *mut c_int,
    _delta: *mut c_int,
) -> *mut c_char {
    write_int(extra, 0);

    let Some(session) = (unsafe { userdata.cast::<PluginSession>().as_mut() }) else {
        return token;
    };
    // A token that reaches the read limit is overlong even when the prefix
    // kept after dropping a split character would fit.
    let pushed = match unsafe { bounded_str(token, MAX_TOKEN_LEN) } {
        Some((_, true)) if session.overlong() == OverlongPolicy::PassThrough => {
            session.pass_through()
        }
        Some((raw, _)) => session.push(raw),
        None => session.pass_through(),
    };
    match pushed.emit {
        Emit::Original => token,
        Emit::Buffer => {
            write_int(extra, c_int::try_from(pushed.extra).unwrap_or(c_int::MAX));
            session.result().as_c_ptr().cast_mut()
        }
    }
}

/// Return the next extra token for the last pushed token, or NULL when
/// there are none left. Extra tokens share the source token's position,
/// so `*delta` is set to 0.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn luk_get_extra_token(
    userdata: *mut c_void,
    delta: *mut c_int,
) -> *mut c_char {
    let Some(session) = (unsafe { userdata.cast::<PluginSession>().as_mut() }) else {
        return ptr::null_mut();
    };
    if session.pull_extra_token().is_none() {
        return ptr::null_mut();
    }
    write_int(delta, 0);
    session.result().as_c_ptr().cast_mut()
}

// ── Internal helpers ────────────────────────────────────────────

/// Read a NUL-terminated string, looking at no more than `limit` bytes.
///
/// Returns the text and whether it was cut at `limit`. A cut token may end
/// inside a character; the partial character is dropped. Returns `None` for
/// NULL or invalid UTF-8.
unsafe fn bounded_str<'a>(s: *const c_char, limit: usize) -> Option<(&'a str, bool)> {
    if s.is_null() {
        return None;
    }
    let mut len = 0;
    while len < limit && unsafe { *s.add(len) } != 0 {
        len += 1;
    }
    let cut = len == limit;
    let bytes = unsafe { slice::from_raw_parts(s.cast::<u8>(), len) };
    match std::str::from_utf8(bytes) {
        Ok(text) => Some((text, cut)),
        Err(e) if cut && e.error_len().is_none() => {
            std::str::from_utf8(&bytes[..e.valid_up_to()]).ok().map(|t| (t, cut))
        }
        Err(_) => None,
    }
}

/// Copy `message` into the host's error buffer, truncated to fit.
fn write_error(out: *mut c_char, message: &str) {
    if out.is_null() {
        return;
    }
    let message = clip(message, SPH_UDF_ERROR_LEN - 1);
    // SAFETY: the host passes a buffer of SPH_UDF_ERROR_LEN bytes.
    unsafe {
        ptr::copy_nonoverlapping(message.as_ptr(), out.cast::<u8>(), message.len());
        *out.add(message.len()) = 0;
    }
}

fn write_int(out: *mut c_int, value: c_int) {
    if !out.is_null() {
        unsafe { *out = value };
    }
}
