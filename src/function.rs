/// A callable that can be invoked with its arguments packed into a tuple.
///
/// This is implemented for all `Fn` closures and function items taking up to
/// twelve arguments. It allows a [`Memoized`](crate::Memoized) wrapper to be
/// called with the same argument shape as the function it wraps:
///
/// ```
/// use cacher::Function;
///
/// let add = |a: i32, b: i32| a + b;
/// assert_eq!(add.invoke((1, 2)), 3);
/// ```
pub trait Function<Args> {
    /// What the function returns.
    type Output;

    /// Call the function with unpacked arguments.
    fn invoke(&self, args: Args) -> Self::Output;
}

macro_rules! impl_function {
    ($($param:ident),*) => {
        #[allow(non_snake_case)]
        impl<Func, Out, $($param),*> Function<($($param,)*)> for Func
        where
            Func: Fn($($param),*) -> Out,
        {
            type Output = Out;

            #[inline]
            fn invoke(&self, ($($param,)*): ($($param,)*)) -> Out {
                self($($param),*)
            }
        }
    };
}

impl_function! {}
impl_function! { A }
impl_function! { A, B }
impl_function! { A, B, C }
impl_function! { A, B, C, D }
impl_function! { A, B, C, D, E }
impl_function! { A, B, C, D, E, F }
impl_function! { A, B, C, D, E, F, G }
impl_function! { A, B, C, D, E, F, G, H }
impl_function! { A, B, C, D, E, F, G, H, I }
impl_function! { A, B, C, D, E, F, G, H, I, J }
impl_function! { A, B, C, D, E, F, G, H, I, J, K }
impl_function! { A, B, C, D, E, F, G, H, I, J, K, L }
