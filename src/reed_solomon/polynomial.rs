//! Dense polynomial over a Galois field
//!
//! Coefficients are stored highest degree first. Leading zero coefficients
//! are allowed; `degree()` skips them. The in-place operations (`add`,
//! `multiply_by_scalar`, `shift`) return `&mut Self` so they can be chained;
//! clone first when the original is still needed.
use super::field::GaloisField;
use crate::error::DecodeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polynomial<'f> {
    field: &'f GaloisField,
    coefficients: Vec<u16>,
}

impl<'f> Polynomial<'f> {
    /// Wrap coefficients given highest degree first
    pub fn from_coefficients(field: &'f GaloisField, coefficients: Vec<u16>) -> Self {
        let coefficients = if coefficients.is_empty() {
            vec![0]
        } else {
            coefficients
        };
        Self {
            field,
            coefficients,
        }
    }

    pub fn zero(field: &'f GaloisField) -> Self {
        Self::from_coefficients(field, vec![0])
    }

    pub fn one(field: &'f GaloisField) -> Self {
        Self::from_coefficients(field, vec![1])
    }

    /// `coefficient * x^degree`
    pub fn monomial(field: &'f GaloisField, degree: usize, coefficient: u16) -> Self {
        let mut coefficients = vec![0; degree + 1];
        coefficients[0] = coefficient;
        Self::from_coefficients(field, coefficients)
    }

    pub fn field(&self) -> &'f GaloisField {
        self.field
    }

    pub fn coefficients(&self) -> &[u16] {
        &self.coefficients
    }

    fn first_nonzero(&self) -> Option<usize> {
        self.coefficients.iter().position(|&c| c != 0)
    }

    pub fn is_zero(&self) -> bool {
        self.first_nonzero().is_none()
    }

    /// Degree of the highest nonzero term (0 for the zero polynomial)
    pub fn degree(&self) -> usize {
        match self.first_nonzero() {
            Some(idx) => self.coefficients.len() - 1 - idx,
            None => 0,
        }
    }

    pub fn leading_coefficient(&self) -> u16 {
        self.first_nonzero()
            .map(|idx| self.coefficients[idx])
            .unwrap_or(0)
    }

    pub fn constant_coefficient(&self) -> u16 {
        self.coefficients.last().copied().unwrap_or(0)
    }

    /// Coefficient of `x^degree`
    pub fn coefficient(&self, degree: usize) -> u16 {
        if degree >= self.coefficients.len() {
            return 0;
        }
        self.coefficients[self.coefficients.len() - 1 - degree]
    }

    /// Add `other` in place, growing `self` when `other` is longer
    pub fn add(&mut self, other: &Polynomial<'_>) -> &mut Self {
        if other.coefficients.len() > self.coefficients.len() {
            let grow = other.coefficients.len() - self.coefficients.len();
            self.coefficients.splice(0..0, std::iter::repeat_n(0, grow));
        }
        let offset = self.coefficients.len() - other.coefficients.len();
        for (dst, &src) in self.coefficients[offset..]
            .iter_mut()
            .zip(other.coefficients.iter())
        {
            *dst = GaloisField::add(*dst, src);
        }
        self
    }

    /// Full product, returned as a new polynomial
    pub fn multiply(&self, other: &Polynomial<'_>) -> Polynomial<'f> {
        if self.is_zero() || other.is_zero() {
            return Polynomial::zero(self.field);
        }
        let mut product = vec![0u16; self.coefficients.len() + other.coefficients.len() - 1];
        for (i, &a) in self.coefficients.iter().enumerate() {
            if a == 0 {
                continue;
            }
            for (j, &b) in other.coefficients.iter().enumerate() {
                product[i + j] ^= self.field.multiply(a, b);
            }
        }
        Polynomial::from_coefficients(self.field, product)
    }

    pub fn multiply_by_scalar(&mut self, scalar: u16) -> &mut Self {
        for c in self.coefficients.iter_mut() {
            *c = self.field.multiply(*c, scalar);
        }
        self
    }

    /// Multiply by `x^k`
    pub fn shift(&mut self, k: usize) -> &mut Self {
        self.coefficients.extend(std::iter::repeat_n(0, k));
        self
    }

    /// Horner evaluation
    pub fn evaluate_at(&self, x: u16) -> u16 {
        self.coefficients
            .iter()
            .fold(0u16, |acc, &c| self.field.multiply(acc, x) ^ c)
    }

    /// All nonzero field elements that are roots, found by exhaustive search
    pub fn find_zeroes(&self) -> Vec<u16> {
        (0..self.field.order())
            .map(|power| self.field.exp(power))
            .filter(|&x| self.evaluate_at(x) == 0)
            .collect()
    }

    /// Long division, returning `(quotient, remainder)`
    pub fn divide(&self, divisor: &Polynomial<'_>) -> Result<(Polynomial<'f>, Polynomial<'f>), DecodeError> {
        if divisor.is_zero() {
            return Err(DecodeError::ZeroDivisor);
        }

        let mut quotient = Polynomial::zero(self.field);
        let mut remainder = self.clone();
        let lead_inverse = self.field.invert(divisor.leading_coefficient());

        while !remainder.is_zero() && remainder.degree() >= divisor.degree() {
            let degree_diff = remainder.degree() - divisor.degree();
            let scale = self
                .field
                .multiply(remainder.leading_coefficient(), lead_inverse);

            quotient.add(&Polynomial::monomial(self.field, degree_diff, scale));
            remainder.add(divisor.clone().multiply_by_scalar(scale).shift(degree_diff));
        }

        Ok((quotient, remainder))
    }
}
