//! Argument list marshaling
//!
//! Whole argument lists are converted element by element through a
//! [`ScalarCodec`]. A list is either converted completely or not at all: on
//! failure every handle converted so far is dropped (released) before the
//! error is returned.

use crate::{BridgeError, Scalar, ScalarCodec};

/// Argument list in the callee's representation, owned for the duration of one call.
#[derive(Debug)]
pub struct ArgList<F> {
    values: Vec<F>,
}

impl<F> ArgList<F> {
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[F] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<F> {
        self.values
    }
}

impl<F> IntoIterator for ArgList<F> {
    type Item = F;
    type IntoIter = std::vec::IntoIter<F>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

/// Converts host scalars into the callee's argument list, preserving order and length.
pub fn pack<C: ScalarCodec + ?Sized>(
    codec: &C,
    values: &[Scalar],
) -> Result<ArgList<C::Foreign>, BridgeError> {
    let mut packed = Vec::with_capacity(values.len());
    for (index, value) in values.iter().enumerate() {
        let foreign = codec
            .to_foreign(value)
            .map_err(|err| err.at_argument(index))?;
        packed.push(foreign);
    }
    Ok(ArgList { values: packed })
}

/// Converts a foreign argument list into host scalars, preserving order and length.
pub fn unpack<C: ScalarCodec + ?Sized>(
    codec: &C,
    values: &[C::Foreign],
) -> Result<Vec<Scalar>, BridgeError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            codec
                .from_foreign(value)
                .map_err(|err| err.at_argument(index))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, ValueKind};
    use std::cell::Cell;
    use std::rc::Rc;

    // Handle that tracks how many foreign values are still alive.
    #[derive(Debug)]
    struct Handle {
        value: Option<Scalar>,
        live: Rc<Cell<usize>>,
    }

    impl Drop for Handle {
        fn drop(&mut self) {
            self.live.set(self.live.get() - 1);
        }
    }

    struct CountingCodec {
        live: Rc<Cell<usize>>,
        rejects: Option<ValueKind>,
    }

    impl CountingCodec {
        fn new(rejects: Option<ValueKind>) -> Self {
            Self {
                live: Rc::new(Cell::new(0)),
                rejects,
            }
        }

        fn handle(&self, value: Option<Scalar>) -> Handle {
            self.live.set(self.live.get() + 1);
            Handle {
                value,
                live: Rc::clone(&self.live),
            }
        }
    }

    impl ScalarCodec for CountingCodec {
        type Foreign = Handle;

        fn probe(&self, value: &Handle, kind: ValueKind) -> bool {
            value.value.as_ref().map(Scalar::kind) == Some(kind)
        }

        fn describe(&self, value: &Handle) -> String {
            match &value.value {
                Some(scalar) => scalar.kind().to_string(),
                None => "object".to_string(),
            }
        }

        fn to_foreign(&self, value: &Scalar) -> Result<Handle, BridgeError> {
            if Some(value.kind()) == self.rejects {
                return Err(BridgeError::unsupported(value.kind().name()));
            }
            Ok(self.handle(Some(value.clone())))
        }

        fn extract(&self, value: &Handle, _kind: ValueKind) -> Result<Scalar, BridgeError> {
            value
                .value
                .clone()
                .ok_or_else(|| BridgeError::unsupported(self.describe(value)))
        }
    }

    fn sample(n: usize) -> Vec<Scalar> {
        (0..n).map(|i| Scalar::Int(i as i32 * 10)).collect()
    }

    #[test]
    fn pack_preserves_order_and_count() {
        let codec = CountingCodec::new(None);
        for arity in [0, 1, 5] {
            let values = sample(arity);
            let packed = pack(&codec, &values).unwrap();
            assert_eq!(packed.len(), arity);

            let seen: Vec<Scalar> = packed
                .as_slice()
                .iter()
                .filter_map(|handle| handle.value.clone())
                .collect();
            assert_eq!(seen, values);
        }
        assert_eq!(codec.live.get(), 0);
    }

    #[test]
    fn failed_pack_releases_converted_elements() {
        let codec = CountingCodec::new(Some(ValueKind::Str));
        let mixed = vec![
            Scalar::Bool(true),
            Scalar::Int(3),
            Scalar::from("x"),
            Scalar::Float(2.5),
        ];

        let err = pack(&codec, &mixed).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedValue);
        assert_eq!(
            err,
            BridgeError::UnsupportedValueKind {
                kind: "string".into(),
                argument: Some(2),
            }
        );
        assert_eq!(codec.live.get(), 0);
    }

    #[test]
    fn unpack_preserves_order() {
        let codec = CountingCodec::new(None);
        let mixed = vec![
            Scalar::Bool(true),
            Scalar::Int(3),
            Scalar::from("x"),
            Scalar::Float(2.5),
            Scalar::Long(-9),
        ];
        let packed = pack(&codec, &mixed).unwrap();
        assert_eq!(unpack(&codec, packed.as_slice()).unwrap(), mixed);
        assert!(unpack(&codec, &[]).unwrap().is_empty());
    }

    #[test]
    fn unpack_aborts_on_unsupported_element() {
        let codec = CountingCodec::new(None);
        let foreign = vec![
            codec.handle(Some(Scalar::Int(1))),
            codec.handle(None),
            codec.handle(Some(Scalar::Int(3))),
        ];

        let err = unpack(&codec, &foreign).unwrap_err();
        assert_eq!(
            err,
            BridgeError::UnsupportedValueKind {
                kind: "object".into(),
                argument: Some(1),
            }
        );

        drop(foreign);
        assert_eq!(codec.live.get(), 0);
    }
}
