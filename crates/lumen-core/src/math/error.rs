// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Errors reported by the fallible operations of the math module.

use std::fmt;

/// An error produced by a math constructor, accessor or solver.
#[derive(Debug, Clone, PartialEq)]
pub enum MathError {
    /// A constructor argument lies outside its valid domain.
    ArgumentOutOfRange {
        /// The name of the offending argument.
        argument: &'static str,
        /// A human-readable description of the accepted range.
        expected: &'static str,
        /// The value that was supplied.
        value: f32,
    },
    /// A row, column or component index is outside the container.
    IndexOutOfRange {
        /// The index that was requested.
        index: usize,
        /// The number of valid indices.
        len: usize,
    },
    /// A matrix has no inverse (a zero pivot was met during elimination).
    SingularMatrix,
}

impl MathError {
    pub(crate) fn out_of_range(argument: &'static str, expected: &'static str, value: f32) -> Self {
        MathError::ArgumentOutOfRange {
            argument,
            expected,
            value,
        }
    }
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathError::ArgumentOutOfRange {
                argument,
                expected,
                value,
            } => write!(
                f,
                "Argument '{argument}' out of range: expected {expected}, got {value}"
            ),
            MathError::IndexOutOfRange { index, len } => {
                write!(f, "Index {index} out of range for length {len}")
            }
            MathError::SingularMatrix => write!(f, "Matrix is singular and cannot be inverted"),
        }
    }
}

impl std::error::Error for MathError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_math_error_display() {
        let err = MathError::out_of_range("z_near", "> 0", -1.0);
        assert_eq!(
            format!("{err}"),
            "Argument 'z_near' out of range: expected > 0, got -1"
        );

        let err = MathError::IndexOutOfRange { index: 4, len: 4 };
        assert_eq!(format!("{err}"), "Index 4 out of range for length 4");

        assert_eq!(
            format!("{}", MathError::SingularMatrix),
            "Matrix is singular and cannot be inverted"
        );
    }
}
