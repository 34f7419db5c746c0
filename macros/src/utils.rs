use syn::parse::{Parse, ParseStream};
use syn::token::Token;

use super::*;

/// Parse an optional `key = value` pair, followed by an optional comma.
pub fn parse_key_value<K: Token + Default + Parse, V: Parse>(
    input: ParseStream,
) -> Result<Option<V>> {
    if !input.peek(|_| K::default()) {
        return Ok(None);
    }

    let _: K = input.parse()?;
    let _: syn::Token![=] = input.parse()?;
    let value = input.parse::<V>()?;
    let _: Option<syn::Token![,]> = input.parse()?;
    Ok(Some(value))
}
