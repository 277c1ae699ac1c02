//! The four-valued signal domain and its combination rule.

use std::fmt;

/// A logic level as seen on a terminal or net.
///
/// `Float` is the undriven state, `Contention` the state of two or more
/// conflicting drivers. For combination purposes the values order as
/// Float < {High, Low} < Contention; High and Low are not ordered against
/// each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Signal {
    High,
    Low,
    #[default]
    Float,
    Contention,
}

impl Signal {
    /// True for `High` or `Low`: a value actively driven onto a net.
    pub fn is_driven(self) -> bool {
        matches!(self, Signal::High | Signal::Low)
    }

    /// Combine a multiset of driver outputs into the value a listener sees.
    ///
    /// Folds from `Float`: `Contention` absorbs, two distinct driven values
    /// collide into `Contention`, `Float` changes nothing. Commutative and
    /// associative, so the enumeration order of `signals` is irrelevant.
    /// An empty multiset combines to `Float`.
    pub fn combine<I>(signals: I) -> Signal
    where
        I: IntoIterator<Item = Signal>,
    {
        let mut result = Signal::Float;
        for signal in signals {
            match signal {
                Signal::Contention => return Signal::Contention,
                Signal::High | Signal::Low => {
                    if result.is_driven() && result != signal {
                        return Signal::Contention;
                    }
                    result = signal;
                }
                Signal::Float => {}
            }
        }
        result
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Signal::High => "high",
            Signal::Low => "low",
            Signal::Float => "float",
            Signal::Contention => "contention",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const ALL: [Signal; 4] = [Signal::High, Signal::Low, Signal::Float, Signal::Contention];

    #[test]
    fn combine_empty_is_float() {
        assert_eq!(Signal::combine([]), Signal::Float);
    }

    #[rstest]
    #[case(&[Signal::High], Signal::High)]
    #[case(&[Signal::Low], Signal::Low)]
    #[case(&[Signal::Float], Signal::Float)]
    #[case(&[Signal::High, Signal::High], Signal::High)]
    #[case(&[Signal::Low, Signal::Low], Signal::Low)]
    #[case(&[Signal::High, Signal::Low], Signal::Contention)]
    #[case(&[Signal::High, Signal::Float], Signal::High)]
    #[case(&[Signal::Float, Signal::Float, Signal::Low], Signal::Low)]
    #[case(&[Signal::Contention, Signal::Float], Signal::Contention)]
    #[case(&[Signal::High, Signal::Contention, Signal::High], Signal::Contention)]
    fn combine_cases(#[case] inputs: &[Signal], #[case] expected: Signal) {
        assert_eq!(Signal::combine(inputs.iter().copied()), expected);
    }

    #[test]
    fn combine_is_commutative() {
        for &a in &ALL {
            for &b in &ALL {
                assert_eq!(
                    Signal::combine([a, b]),
                    Signal::combine([b, a]),
                    "combine({a}, {b})"
                );
            }
        }
    }

    #[test]
    fn combine_is_associative() {
        for &a in &ALL {
            for &b in &ALL {
                for &c in &ALL {
                    let ab = Signal::combine([a, b]);
                    let bc = Signal::combine([b, c]);
                    assert_eq!(
                        Signal::combine([ab, c]),
                        Signal::combine([a, bc]),
                        "combine({a}, {b}, {c})"
                    );
                    assert_eq!(Signal::combine([ab, c]), Signal::combine([a, b, c]));
                }
            }
        }
    }

    #[test]
    fn float_is_identity() {
        for &s in &ALL {
            assert_eq!(Signal::combine([s, Signal::Float]), s);
        }
    }
}
