extern crate proc_macro;

macro_rules! bail {
    ($item:expr, $fmt:literal $($tts:tt)*) => {
        return Err(Error::new_spanned(
            &$item,
            format!(concat!("cacher: ", $fmt) $($tts)*)
        ))
    }
}

mod memoize;
mod utils;

use proc_macro::TokenStream;
use quote::quote;
use syn::{Error, Result, parse_quote};

/// Memoize a pure function.
///
/// Results are stored in a process-wide store, keyed by the function's name
/// (lower-cased) and its arguments. All arguments must implement `Hash` and
/// the return type must be `Clone + Send + Sync + 'static`.
///
/// ```ignore
/// #[cacher::memoize]
/// fn sum(a: u32, b: u32) -> u32 {
///     a + b
/// }
/// ```
///
/// If the return type is a `Result`, only `Ok` values are memoized and errors
/// are recomputed on the next call:
///
/// ```ignore
/// #[cacher::memoize]
/// fn parse(text: &str) -> Result<i32, std::num::ParseIntError> {
///     text.trim().parse()
/// }
/// ```
///
/// The name under which results are stored can be overridden. Functions
/// sharing a name and argument types share their results.
///
/// ```ignore
/// #[cacher::memoize(name = "area")]
/// fn rectangle_area(width: u64, height: u64) -> u64 {
///     width * height
/// }
/// ```
#[proc_macro_attribute]
pub fn memoize(args: TokenStream, stream: TokenStream) -> TokenStream {
    let meta = syn::parse_macro_input!(args as memoize::Meta);
    let func = syn::parse_macro_input!(stream as syn::ItemFn);
    memoize::expand(meta, func)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
