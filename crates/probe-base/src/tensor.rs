use std::fmt;

#[derive(Debug, PartialEq)]
pub enum TensorError {
    ShapeOverflow,
    ShapeMismatch { expected: usize, got: usize },
}

impl fmt::Display for TensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorError::ShapeOverflow => write!(f, "shape dimensions overflow when multiplied"),
            TensorError::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {expected} elements, got {got}")
            }
        }
    }
}

impl std::error::Error for TensorError {}

#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<T> {
    pub shape: Vec<usize>,
    pub data: Vec<T>,
}

// Compute shape product using checked_mul to detect overflow
fn element_count(shape: &[usize]) -> Result<usize, TensorError> {
    let mut product: usize = 1;
    for &dim in shape {
        product = product
            .checked_mul(dim)
            .ok_or(TensorError::ShapeOverflow)?;
    }
    Ok(product)
}

impl<T> Tensor<T> {
    pub fn new(shape: Vec<usize>, data: Vec<T>) -> Result<Self, TensorError> {
        let product = element_count(&shape)?;
        if product != data.len() {
            return Err(TensorError::ShapeMismatch {
                expected: product,
                got: data.len(),
            });
        }

        Ok(Self { shape, data })
    }

    pub fn from_scalar(value: T) -> Self {
        Self {
            shape: vec![],
            data: vec![value],
        }
    }

    pub fn reshape(self, shape: Vec<usize>) -> Result<Self, TensorError> {
        let expected = element_count(&shape)?;
        if expected != self.data.len() {
            return Err(TensorError::ShapeMismatch {
                expected,
                got: self.data.len(),
            });
        }

        Ok(Self {
            shape,
            data: self.data,
        })
    }

    pub fn get(&self, index: &[usize]) -> Option<&T> {
        if index.len() != self.shape.len() {
            return None;
        }

        // Row-major offset, walking dimensions from the innermost out
        let mut offset = 0;
        let mut stride = 1;
        for (&idx, &dim) in index.iter().zip(&self.shape).rev() {
            if idx >= dim {
                return None;
            }
            offset += idx * stride;
            stride *= dim;
        }

        self.data.get(offset)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T: Default + Clone> Tensor<T> {
    pub fn zeros(shape: Vec<usize>) -> Result<Self, TensorError> {
        let product = element_count(&shape)?;
        let data = vec![T::default(); product];
        Ok(Self { shape, data })
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
    write!(f, "[")?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", value)?;
    }
    write!(f, "]")
}

impl<T: fmt::Display> fmt::Display for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shape.len() {
            0 => match self.data.first() {
                Some(value) => write!(f, "{}", value),
                None => write!(f, "[]"),
            },
            1 => write_list(f, &self.data),
            2 => {
                let rows = self.shape[0];
                let cols = self.shape[1];
                // The fields are public, so the data can disagree with the shape
                if rows.checked_mul(cols) != Some(self.data.len()) {
                    write!(f, "tensor of shape {:?}: ", self.shape)?;
                    return write_list(f, &self.data);
                }
                write!(f, "[")?;
                for r in 0..rows {
                    if r > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "[")?;
                    for c in 0..cols {
                        if c > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", self.data[r * cols + c])?;
                    }
                    write!(f, "]")?;
                }
                write!(f, "]")
            }
            _ => {
                write!(f, "tensor of shape {:?}: ", self.shape)?;
                write_list(f, &self.data)
            }
        }
    }
}
