//! The `pipe!` macro: left-to-right application.

/// Pipes a value through functions from left to right.
///
/// `pipe!(x, f, g, h)` is `h(g(f(x)))`, the same as
/// `compose!(h, g, f)(x)`. Each function is called once, so [`FnOnce`]
/// closures that consume their captures are accepted.
///
/// # Examples
///
/// ```
/// use graham::pipe;
///
/// fn add_one(x: i32) -> i32 { x + 1 }
/// fn double(x: i32) -> i32 { x * 2 }
///
/// assert_eq!(pipe!(5, double, add_one), 11);
/// ```
///
/// Driving a lazy pipeline:
///
/// ```
/// use graham::lazy::LazySequence;
/// use graham::pipe;
///
/// let firsts = pipe!(
///     LazySequence::infinite(1),
///     |sequence: LazySequence<i64>| sequence.map(|n| n * n),
///     |sequence: LazySequence<i64>| sequence.take(4),
///     |sequence: LazySequence<i64>| sequence.to_list()
/// );
/// assert_eq!(firsts, Ok(vec![1, 4, 9, 16]));
/// ```
#[macro_export]
macro_rules! pipe {
    ($value:expr $(,)?) => {
        $value
    };

    ($value:expr, $function:expr $(,)?) => {
        $function($value)
    };

    ($value:expr, $function:expr, $($remaining_functions:expr),+ $(,)?) => {
        $crate::pipe!($function($value), $($remaining_functions),+)
    };
}
