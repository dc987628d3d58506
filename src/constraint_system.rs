//! Constraint system builder.
//!
//! Circuits are written once against [`ConstraintSystem`] and run in two
//! modes. In setup mode no values are known and only the shape is recorded;
//! in prove mode every allocation carries its value and gadgets compute
//! their hint values (inverses, S-box intermediates) as they go. Both runs
//! produce the same constraints in the same order.

use crate::errors::R1CSError;
use crate::linear_combination::{LinearCombination, Variable};
use crate::r1cs::R1CSShape;
use crate::scalar::Scalar;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SynthesisMode {
    /// Record constraints only
    Setup,
    /// Record constraints and the full assignment
    Prove,
}

#[derive(Clone, Debug)]
struct Constraint {
    a: LinearCombination,
    b: LinearCombination,
    c: LinearCombination,
    label: String,
}

/// Values of every variable, in the column order of [`R1CSShape`].
#[derive(Clone, PartialEq, Eq)]
pub struct Assignment {
    pub vars: Vec<Scalar>,
    pub inputs: Vec<Scalar>,
}

pub struct ConstraintSystem {
    mode: SynthesisMode,
    inputs: Vec<Option<Scalar>>,
    private: Vec<Option<Scalar>>,
    constraints: Vec<Constraint>,
}

impl ConstraintSystem {
    pub fn new(mode: SynthesisMode) -> Self {
        ConstraintSystem {
            mode,
            inputs: Vec::new(),
            private: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn mode(&self) -> SynthesisMode {
        self.mode
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_private(&self) -> usize {
        self.private.len()
    }

    fn check_value(&self, what: &str, value: Option<Scalar>) -> Result<Option<Scalar>, R1CSError> {
        match (self.mode, value) {
            (SynthesisMode::Prove, None) => Err(R1CSError::AssignmentMissing(what.to_string())),
            (SynthesisMode::Setup, _) => Ok(None),
            (SynthesisMode::Prove, v) => Ok(v),
        }
    }

    /// Allocates the next public input; inputs are numbered in allocation order.
    pub fn alloc_input(&mut self, value: Option<Scalar>) -> Result<Variable, R1CSError> {
        let index = self.inputs.len();
        let value = self.check_value(&format!("public input {index}"), value)?;
        self.inputs.push(value);
        Ok(Variable::Input(index))
    }

    pub fn alloc_private(&mut self, value: Option<Scalar>) -> Result<Variable, R1CSError> {
        let index = self.private.len();
        let value = self.check_value(&format!("private variable {index}"), value)?;
        self.private.push(value);
        Ok(Variable::Private(index))
    }

    /// Value of a variable, known only in prove mode.
    pub fn value(&self, var: Variable) -> Option<Scalar> {
        match var {
            Variable::One => Some(Scalar::one()),
            Variable::Input(i) => self.inputs.get(i).copied().flatten(),
            Variable::Private(i) => self.private.get(i).copied().flatten(),
        }
    }

    /// Value of a linear combination, known only in prove mode.
    pub fn eval(&self, lc: &LinearCombination) -> Option<Scalar> {
        lc.evaluate(|var| self.value(var))
    }

    /// Enforces `a * b = c`.
    pub fn enforce<A, B, C>(&mut self, label: impl Into<String>, a: A, b: B, c: C)
    where
        A: Into<LinearCombination>,
        B: Into<LinearCombination>,
        C: Into<LinearCombination>,
    {
        let (a, b, c): (LinearCombination, LinearCombination, LinearCombination) =
            (a.into(), b.into(), c.into());
        self.constraints.push(Constraint {
            a: a.compact(),
            b: b.compact(),
            c: c.compact(),
            label: label.into(),
        });
    }

    /// Enforces `lhs = rhs` as `(lhs - rhs) * 1 = 0`.
    pub fn enforce_equal<L, R>(&mut self, label: impl Into<String>, lhs: L, rhs: R)
    where
        L: Into<LinearCombination>,
        R: Into<LinearCombination>,
    {
        let lhs: LinearCombination = lhs.into();
        let diff = lhs - rhs.into();
        self.enforce(label, diff, Variable::One, LinearCombination::zero());
    }

    /// Produces the shape and, in prove mode, the assignment.
    pub fn finalize(self) -> Result<(R1CSShape, Option<Assignment>), R1CSError> {
        let num_vars = self.private.len();
        let num_inputs = self.inputs.len();
        let column = |var: Variable| match var {
            Variable::Private(i) => i,
            Variable::One => num_vars,
            Variable::Input(i) => num_vars + 1 + i,
        };

        let mut A = Vec::new();
        let mut B = Vec::new();
        let mut C = Vec::new();
        let mut labels = Vec::with_capacity(self.constraints.len());
        for (row, constraint) in self.constraints.into_iter().enumerate() {
            for (var, coeff) in constraint.a.terms {
                A.push((row, column(var), coeff));
            }
            for (var, coeff) in constraint.b.terms {
                B.push((row, column(var), coeff));
            }
            for (var, coeff) in constraint.c.terms {
                C.push((row, column(var), coeff));
            }
            labels.push(constraint.label);
        }

        let shape = R1CSShape::new(labels.len(), num_vars, num_inputs, &A, &B, &C, labels)?;

        let assignment = match self.mode {
            SynthesisMode::Setup => None,
            SynthesisMode::Prove => {
                let collect = |values: Vec<Option<Scalar>>, what: &str| {
                    values
                        .into_iter()
                        .enumerate()
                        .map(|(i, v)| v.ok_or_else(|| R1CSError::AssignmentMissing(format!("{what} {i}"))))
                        .collect::<Result<Vec<_>, _>>()
                };
                Some(Assignment {
                    vars: collect(self.private, "private variable")?,
                    inputs: collect(self.inputs, "public input")?,
                })
            }
        };

        Ok((shape, assignment))
    }
}
