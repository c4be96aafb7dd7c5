//! Derive macros for the rcube ECS.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// Derive macro for the `Component` trait.
///
/// Generates an implementation whose `NAME` is the type's identifier, whose
/// mutable access is a plain `&mut` and which keeps the trait's default
/// (no-op) removal hook. Types that need to
/// react to being removed from their store implement `Component` by hand.
///
/// The `Component` trait must be in scope where the derive is used, e.g.
/// `use rcube_ecs::Component;`.
///
/// # Example
///
/// ```ignore
/// use rcube_ecs::Component;
///
/// #[derive(Component)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// assert_eq!(Health::NAME, "Health");
/// ```
#[proc_macro_derive(Component)]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // Unqualified `Component` so the derive works both inside rcube_ecs and in
    // downstream crates that import the trait.
    let expanded = quote! {
        impl #impl_generics Component for #name #ty_generics #where_clause {
            const NAME: &'static str = stringify!(#name);

            type Mut<'a> = &'a mut Self;

            fn wrap_mut(value: &mut Self) -> &mut Self {
                value
            }
        }
    };

    TokenStream::from(expanded)
}
