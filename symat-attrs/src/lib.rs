mod structures;

use proc_macro::TokenStream;
use quote::ToTokens;
use structures::ErrorKindTarget;
use syn::{parse_macro_input, DeriveInput};

/// Derives `symat_error::ErrorKind` for a struct.
///
/// The text of the error is given by the tags of the `error` attribute:
/// ```
/// use symat_attrs::ErrorKind;
/// use symat_error::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(message = "unexpected end of file", labels = ["add something here"])]
/// pub struct Foo;
///
/// assert_eq!(Foo.message(), "unexpected end of file");
/// ```
///
/// | Tag       | Required | Meaning                                                        |
/// | --------- | -------- | -------------------------------------------------------------- |
/// | `message` | yes      | One-line summary, also returned by `ErrorKind::message`.       |
/// | `labels`  | no       | Array of label texts, attached to the error's spans in order.  |
/// | `help`    | no       | A hint shown under the report.                                 |
///
/// Tags are expressions whose values implement [`ToString`]. Named fields can be used in them
/// directly. Unit structs are supported, tuple structs and enums are not.
///
/// The generated code refers to the `ariadne` and `symat_error` crates, which must be
/// dependencies of the crate using the derive.
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    match ErrorKindTarget::new(input) {
        Ok(target) => target.into_token_stream().into(),
        Err(err) => err.into_compile_error().into(),
    }
}
