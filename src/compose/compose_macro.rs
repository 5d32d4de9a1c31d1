//! The `compose!` macro: right-to-left function composition.

/// Composes functions from right to left.
///
/// `compose!(f, g, h)(x)` is `f(g(h(x)))`: the rightmost function runs
/// first. With no arguments it yields [`identity`](crate::compose::identity).
///
/// Every function must implement [`Fn`], and each output type must match
/// the input type of the function to its left.
///
/// # Examples
///
/// ```
/// use graham::compose;
///
/// fn add_one(x: i32) -> i32 { x + 1 }
/// fn double(x: i32) -> i32 { x * 2 }
///
/// let composed = compose!(add_one, double);
/// assert_eq!(composed(5), 11);
/// ```
///
/// Composing collection operations:
///
/// ```
/// use graham::compose;
/// use graham::persistent::PersistentVector;
///
/// let total = |vector: PersistentVector<i32>| vector.iter().sum::<i32>();
/// let evens = |vector: PersistentVector<i32>| vector.filter(|n| n % 2 == 0);
///
/// let sum_of_evens = compose!(total, evens);
/// assert_eq!(sum_of_evens((1..=6).collect()), 12);
/// ```
///
/// Composition is associative:
///
/// ```
/// use graham::compose;
///
/// fn f(x: i32) -> i32 { x + 1 }
/// fn g(x: i32) -> i32 { x * 2 }
/// fn h(x: i32) -> i32 { x - 3 }
///
/// let left = compose!(f, compose!(g, h));
/// let right = compose!(compose!(f, g), h);
/// assert_eq!(left(10), right(10));
/// ```
#[macro_export]
macro_rules! compose {
    () => {
        $crate::compose::identity
    };

    ($function:expr $(,)?) => {
        $function
    };

    ($outer_function:expr, $inner_function:expr $(,)?) => {{
        let outer = $outer_function;
        let inner = $inner_function;
        move |input| outer(inner(input))
    }};

    ($outer_function:expr, $($remaining_functions:expr),+ $(,)?) => {{
        let outer = $outer_function;
        let inner_composed = $crate::compose!($($remaining_functions),+);
        move |input| outer(inner_composed(input))
    }};
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    #[rstest]
    fn test_compose_empty_is_identity() {
        let composed = compose!();
        assert_eq!(composed(7), 7);
    }

    #[rstest]
    fn test_compose_single() {
        let double = |x: i32| x * 2;
        let composed = compose!(double);
        assert_eq!(composed(5), 10);
    }

    #[rstest]
    fn test_compose_applies_right_to_left() {
        let add_one = |x: i32| x + 1;
        let double = |x: i32| x * 2;
        let square = |x: i32| x * x;
        let composed = compose!(add_one, double, square);
        assert_eq!(composed(3), 19);
    }

    #[rstest]
    fn test_compose_changes_type() {
        let length = |text: String| text.len();
        let render = |n: i64| n.to_string();
        assert_eq!(compose!(length, render)(-1234), 5);
    }
}
