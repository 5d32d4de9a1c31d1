//! The `partial!` macro: fix some arguments now, supply the rest later.

#[doc(hidden)]
#[macro_export]
macro_rules! __partial_bind {
    ($function:ident; [$($parameter:ident)*]; [$($argument:expr),*];) => {
        move |$($parameter),*| $function($($argument),*)
    };

    ($function:ident; [$($parameter:ident)*]; [$($argument:expr),*]; __ $(, $($rest:tt)*)?) => {
        $crate::__partial_bind!(
            $function;
            [$($parameter)* open];
            [$($argument,)* open];
            $($($rest)*)?
        )
    };

    ($function:ident; [$($parameter:ident)*]; [$($argument:expr),*]; $value:expr $(, $($rest:tt)*)?) => {{
        let fixed = $value;
        $crate::__partial_bind!(
            $function;
            [$($parameter)*];
            [$($argument,)* fixed.clone()];
            $($($rest)*)?
        )
    }};
}

/// Partially applies a function.
///
/// Each argument position is either a value, which is fixed now, or the
/// placeholder `__`, which becomes a parameter of the returned closure.
/// Open positions keep their order. With no placeholder the result is a
/// thunk taking no arguments.
///
/// Fixed values are evaluated once, when `partial!` runs, and cloned into
/// every call, so they must implement [`Clone`] and the result implements
/// [`Fn`].
///
/// Write `__` literally; it is matched as a token and needs no import.
///
/// # Examples
///
/// Fixing leading arguments:
///
/// ```
/// use graham::partial;
///
/// fn greet(greeting: &str, name: &str) -> String {
///     format!("{greeting}, {name}!")
/// }
///
/// let hello = partial!(greet, "Hello", __);
/// assert_eq!(hello("World"), "Hello, World!");
/// ```
///
/// Leaving a middle argument open:
///
/// ```
/// use graham::partial;
/// use graham::persistent::PersistentVector;
///
/// let replace = |vector: PersistentVector<char>, index: usize, value: char| {
///     vector.set(index, value).unwrap_or(vector)
/// };
/// let word = PersistentVector::of(['c', 'a', 't']);
/// let with_last = partial!(replace, word, 2, __);
///
/// assert_eq!(with_last('r').iter().collect::<String>(), "car");
/// assert_eq!(with_last('p').iter().collect::<String>(), "cap");
/// ```
///
/// A thunk:
///
/// ```
/// use graham::partial;
///
/// let answer = partial!(|left: i32, right: i32| left * right, 6, 7);
/// assert_eq!(answer(), 42);
/// ```
#[macro_export]
macro_rules! partial {
    ($function:expr $(, $($arguments:tt)*)?) => {{
        let function = $function;
        $crate::__partial_bind!(function; []; []; $($($arguments)*)?)
    }};
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    fn describe(name: &str, age: u32, city: &str) -> String {
        format!("{name} ({age}) from {city}")
    }

    #[rstest]
    fn test_partial_fixes_first_argument() {
        let subtract_from_ten = partial!(|left: i32, right: i32| left - right, 10, __);
        assert_eq!(subtract_from_ten(3), 7);
    }

    #[rstest]
    fn test_partial_fixes_last_argument() {
        let subtract_ten = partial!(|left: i32, right: i32| left - right, __, 10);
        assert_eq!(subtract_ten(3), -7);
    }

    #[rstest]
    fn test_partial_keeps_open_positions_in_order() {
        let in_paris = partial!(describe, __, __, "Paris");
        assert_eq!(in_paris("Ana", 31), "Ana (31) from Paris");

        let aged = partial!(describe, __, 40, __);
        assert_eq!(aged("Bo", "Oslo"), "Bo (40) from Oslo");
    }

    #[rstest]
    fn test_partial_all_open_forwards_arguments() {
        let forwarded = partial!(describe, __, __, __);
        assert_eq!(forwarded("Cy", 9, "Rome"), "Cy (9) from Rome");
    }

    #[rstest]
    fn test_partial_fixed_value_is_evaluated_once() {
        let mut evaluations = 0;
        let mut next_prefix = || {
            evaluations += 1;
            format!("#{evaluations}")
        };
        let label = |prefix: String, text: &str| format!("{prefix} {text}");
        let tag = partial!(label, next_prefix(), __);

        assert_eq!(tag("a"), "#1 a");
        assert_eq!(tag("b"), "#1 b");
        assert_eq!(evaluations, 1);
    }
}
