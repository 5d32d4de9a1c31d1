//! The `curry2!` to `curry5!` macros: one argument at a time.
//!
//! A curried function takes its first argument and returns a closure waiting
//! for the next one, until the last argument runs the original function.
//! Every intermediate closure implements [`Fn`] and can be applied any number
//! of times; the arguments it has captured are shared through `Rc` and
//! cloned out for each final call.

#[doc(hidden)]
#[macro_export]
macro_rules! __curry_chain {
    ($function:ident; [$($bound:ident)*]; $last:ident) => {
        move |$last| {
            $function(
                $(::std::rc::Rc::unwrap_or_clone(::std::rc::Rc::clone(&$bound)),)*
                $last,
            )
        }
    };

    ($function:ident; [$($bound:ident)*]; $next:ident $($remaining:ident)+) => {
        move |$next| {
            let $function = ::std::rc::Rc::clone(&$function);
            $(let $bound = ::std::rc::Rc::clone(&$bound);)*
            let $next = ::std::rc::Rc::new($next);
            $crate::__curry_chain!($function; [$($bound)* $next]; $($remaining)+)
        }
    };
}

/// Converts a 2-argument function into curried form.
///
/// `curry2!(f)(a)(b)` is `f(a, b)`. The first argument must implement
/// [`Clone`] so a partially applied closure can be reused.
///
/// # Examples
///
/// ```
/// use graham::curry2;
///
/// fn greet(greeting: &str, name: &str) -> String {
///     format!("{greeting}, {name}!")
/// }
///
/// let hello = curry2!(greet)("Hello");
/// assert_eq!(hello("World"), "Hello, World!");
/// assert_eq!(hello("graham"), "Hello, graham!");
/// ```
///
/// Curried functions compose with the rest of the module:
///
/// ```
/// use graham::{curry2, pipe};
///
/// let add = curry2!(|left: i32, right: i32| left + right);
/// let multiply = curry2!(|left: i32, right: i32| left * right);
/// assert_eq!(pipe!(4, add(1), multiply(3)), 15);
/// ```
#[macro_export]
macro_rules! curry2 {
    ($function:expr $(,)?) => {{
        let function = ::std::rc::Rc::new($function);
        $crate::__curry_chain!(function; []; first second)
    }};
}

/// Converts a 3-argument function into curried form.
///
/// Every argument but the last must implement [`Clone`].
///
/// # Examples
///
/// ```
/// use graham::curry3;
/// use graham::persistent::PersistentVector;
///
/// fn splice(vector: PersistentVector<i32>, index: usize, value: i32) -> PersistentVector<i32> {
///     vector.set(index, value).unwrap_or(vector)
/// }
///
/// let base = PersistentVector::of([1, 2, 3]);
/// let at_start = curry3!(splice)(base.clone())(0);
///
/// assert_eq!(at_start(9), PersistentVector::of([9, 2, 3]));
/// assert_eq!(at_start(7), PersistentVector::of([7, 2, 3]));
/// assert_eq!(base, PersistentVector::of([1, 2, 3]));
/// ```
#[macro_export]
macro_rules! curry3 {
    ($function:expr $(,)?) => {{
        let function = ::std::rc::Rc::new($function);
        $crate::__curry_chain!(function; []; first second third)
    }};
}

/// Converts a 4-argument function into curried form.
///
/// # Examples
///
/// ```
/// use graham::curry4;
///
/// let clamp_add = |low: i32, high: i32, base: i32, delta: i32| (base + delta).clamp(low, high);
/// let percent = curry4!(clamp_add)(0)(100);
///
/// assert_eq!(percent(90)(20), 100);
/// assert_eq!(percent(10)(-20), 0);
/// ```
#[macro_export]
macro_rules! curry4 {
    ($function:expr $(,)?) => {{
        let function = ::std::rc::Rc::new($function);
        $crate::__curry_chain!(function; []; first second third fourth)
    }};
}

/// Converts a 5-argument function into curried form.
///
/// # Examples
///
/// ```
/// use graham::curry5;
///
/// let sum = |a: i32, b: i32, c: i32, d: i32, e: i32| a + b + c + d + e;
/// assert_eq!(curry5!(sum)(1)(2)(3)(4)(5), 15);
/// ```
#[macro_export]
macro_rules! curry5 {
    ($function:expr $(,)?) => {{
        let function = ::std::rc::Rc::new($function);
        $crate::__curry_chain!(function; []; first second third fourth fifth)
    }};
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    fn subtract(left: i32, right: i32) -> i32 {
        left - right
    }

    fn join(first: String, second: String, third: String) -> String {
        format!("{first}-{second}-{third}")
    }

    #[rstest]
    fn test_curry2_applies_in_order() {
        assert_eq!(curry2!(subtract)(10)(3), 7);
    }

    #[rstest]
    fn test_curry2_partial_application_is_reusable() {
        let from_ten = curry2!(subtract)(10);
        assert_eq!(from_ten(1), 9);
        assert_eq!(from_ten(4), 6);
    }

    #[rstest]
    fn test_curry3_clones_owned_arguments() {
        let curried = curry3!(join);
        let prefixed = curried("a".to_string())("b".to_string());
        assert_eq!(prefixed("c".to_string()), "a-b-c");
        assert_eq!(prefixed("d".to_string()), "a-b-d");
    }

    #[rstest]
    fn test_curry4_and_curry5() {
        let volume = |a: i64, b: i64, c: i64, d: i64| a * b * c * d;
        assert_eq!(curry4!(volume)(1)(2)(3)(4), 24);

        let digits =
            |a: u32, b: u32, c: u32, d: u32, e: u32| ((((a * 10 + b) * 10 + c) * 10) + d) * 10 + e;
        assert_eq!(curry5!(digits)(1)(2)(3)(4)(5), 12_345);
    }
}
