mod route;

use proc_macro::TokenStream;

/// Creates a new documentation function for the route, named after the original function with the suffix `_docs`.
///
/// The first line of the doc comment becomes the operation summary and the
/// remaining lines its description.
///
/// ```rust,ignore
/// /// Get entries
/// /// Returns every entry.
/// #[route(tag = tag::GUESTBOOK, response(status = 200, shape = "Json<Vec<Entry>>"))]
/// pub async fn list_entries() -> Json<Vec<Entry>> {
///   // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn route(args: TokenStream, input: TokenStream) -> TokenStream {
	route::from_input(args, input)
}
