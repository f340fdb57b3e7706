use std::ops::{BitAnd, BitOr, BitXor};

/// One-bit full adder: returns `(sum, carry)` for addends `a`, `b` and
/// carry-in `c`.
///
/// Works on anything with boolean operators: `bool` for evaluation,
/// `Signal` to build the circuit.
pub fn fulladder<T>(a: T, b: T, c: T) -> (T, T)
where
    T: Clone + BitXor<Output = T> + BitAnd<Output = T> + BitOr<Output = T>,
{
    let sum = a.clone() ^ b.clone() ^ c.clone();
    let carry = (a.clone() & b.clone()) | (b & c.clone()) | (c & a);
    (sum, carry)
}
