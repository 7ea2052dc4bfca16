use std::sync::Arc;
use crate::attribute::compound::CompoundValueTuple;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::Value;

/// Coarsens a key so that many nearby keys share one bucket.
/// Must be deterministic: the same input always yields the same key.
pub trait Quantizer<T>: Send + Sync {
    fn quantized(&self, key: &T) -> T;
}

pub type QuantizerRef<T> = Arc<dyn Quantizer<T>>;

/// Rounds integers toward zero to a multiple of `compression_factor`.
/// 5 -> 0, 15 -> 10, -15 -> -10 for a factor of 10.
/// Non-integer values pass through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerQuantizer {
    pub compression_factor: i64,
}

impl IntegerQuantizer {
    pub fn with_compression_factor(compression_factor: i64) -> Result<Self> {
        if compression_factor < 2 {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                format!("Invalid compression factor, must be >= 2: {}", compression_factor),
            ));
        }
        Ok(IntegerQuantizer { compression_factor })
    }

    pub fn quantize(&self, n: i64) -> i64 {
        // Integer division truncates toward zero
        (n / self.compression_factor) * self.compression_factor
    }
}

impl Quantizer<Value> for IntegerQuantizer {
    fn quantized(&self, key: &Value) -> Value {
        match key {
            Value::Integer(n) => Value::Integer(self.quantize(*n)),
            other => other.clone(),
        }
    }
}

/// Quantizer backed by a closure
pub struct FnQuantizer<T> {
    quantize: Arc<dyn Fn(&T) -> T + Send + Sync>,
}

impl<T> FnQuantizer<T> {
    pub fn new<F>(quantize: F) -> Self
    where
        F: Fn(&T) -> T + Send + Sync + 'static,
    {
        FnQuantizer { quantize: Arc::new(quantize) }
    }
}

impl<T> Quantizer<T> for FnQuantizer<T> {
    fn quantized(&self, key: &T) -> T {
        (self.quantize)(key)
    }
}

/// Applies a value quantizer per tuple position; None leaves that position exact
pub struct TupleQuantizer {
    positions: Vec<Option<QuantizerRef<Value>>>,
}

impl TupleQuantizer {
    pub fn new(positions: Vec<Option<QuantizerRef<Value>>>) -> Self {
        TupleQuantizer { positions }
    }

    /// Quantize only the given position
    pub fn at(arity: usize, position: usize, quantizer: QuantizerRef<Value>) -> Self {
        let mut positions: Vec<Option<QuantizerRef<Value>>> = vec![None; arity];
        if let Some(slot) = positions.get_mut(position) {
            *slot = Some(quantizer);
        }
        TupleQuantizer { positions }
    }
}

impl Quantizer<CompoundValueTuple> for TupleQuantizer {
    fn quantized(&self, key: &CompoundValueTuple) -> CompoundValueTuple {
        let values = key.values
            .iter()
            .enumerate()
            .map(|(i, value)| match self.positions.get(i) {
                Some(Some(quantizer)) => quantizer.quantized(value),
                _ => value.clone(),
            })
            .collect();
        CompoundValueTuple::new(values)
    }
}
