use crate::constraint_system::ConstraintSystem;
use crate::errors::R1CSError;
use crate::linear_combination::{LinearCombination, Variable};
use crate::scalar::Scalar;

/// if x == 0 then y = 1 else y = 0
/// if x != 0 then inv = x^-1 else inv = 0
/// x * inv = 1 - y
/// x * y = 0
///
/// The second constraint forces y = 0 whenever x != 0, and the first then
/// forces inv to be the true inverse; for x == 0 the first forces y = 1.
/// Returns the boolean `y`.
pub fn is_zero(
    cs: &mut ConstraintSystem,
    x: LinearCombination,
    label: &str,
) -> Result<Variable, R1CSError> {
    let x_val = cs.eval(&x);
    let inv_val = x_val.map(|x| x.invert().unwrap_or_else(Scalar::zero));
    let y_val = x_val.map(|x| Scalar::from(x.is_zero()));

    let inv = cs.alloc_private(inv_val)?;
    let y = cs.alloc_private(y_val)?;

    cs.enforce(format!("{label}: x * inv = 1 - y"), x.clone(), inv, Scalar::one() - y);
    cs.enforce(format!("{label}: x * y = 0"), x, y, LinearCombination::zero());
    Ok(y)
}

/// Boolean `a == b`.
pub fn is_equal<A, B>(cs: &mut ConstraintSystem, a: A, b: B, label: &str) -> Result<Variable, R1CSError>
where
    A: Into<LinearCombination>,
    B: Into<LinearCombination>,
{
    let a: LinearCombination = a.into();
    let b: LinearCombination = b.into();
    is_zero(cs, a - b, label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint_system::SynthesisMode;

    fn run(a: u64, b: u64) -> (bool, Scalar) {
        let mut cs = ConstraintSystem::new(SynthesisMode::Prove);
        let a = cs.alloc_private(Some(Scalar::from_u64(a))).unwrap();
        let b = cs.alloc_input(Some(Scalar::from_u64(b))).unwrap();
        let eq = is_equal(&mut cs, a, b, "eq").unwrap();
        let out = cs.value(eq).unwrap();
        let (shape, assignment) = cs.finalize().unwrap();
        let assignment = assignment.unwrap();
        (shape.is_sat(&assignment.vars, &assignment.inputs), out)
    }

    #[test]
    fn test_equal_values() {
        assert_eq!(run(123456789, 123456789), (true, Scalar::one()));
    }

    #[test]
    fn test_different_values() {
        assert_eq!(run(123456789, 987654321), (true, Scalar::zero()));
    }

    #[test]
    fn test_cheating_flag_is_unsatisfiable() {
        // claim equality for different values by forging the flag
        let mut cs = ConstraintSystem::new(SynthesisMode::Prove);
        let a = cs.alloc_private(Some(Scalar::from_u64(5))).unwrap();
        let b = cs.alloc_private(Some(Scalar::from_u64(6))).unwrap();
        is_equal(&mut cs, a, b, "eq").unwrap();
        let (shape, assignment) = cs.finalize().unwrap();
        let mut assignment = assignment.unwrap();

        // vars: a, b, inv, y
        assignment.vars[3] = Scalar::one();
        assert!(!shape.is_sat(&assignment.vars, &assignment.inputs));
        assignment.vars[2] = Scalar::zero();
        assert!(!shape.is_sat(&assignment.vars, &assignment.inputs));

        // and claim inequality for equal values
        let mut cs = ConstraintSystem::new(SynthesisMode::Prove);
        let a = cs.alloc_private(Some(Scalar::from_u64(5))).unwrap();
        let b = cs.alloc_private(Some(Scalar::from_u64(5))).unwrap();
        is_equal(&mut cs, a, b, "eq").unwrap();
        let (shape, assignment) = cs.finalize().unwrap();
        let mut assignment = assignment.unwrap();
        assignment.vars[3] = Scalar::zero();
        assert!(!shape.is_sat(&assignment.vars, &assignment.inputs));
    }

    #[test]
    fn test_two_constraints() {
        let mut cs = ConstraintSystem::new(SynthesisMode::Setup);
        let x = cs.alloc_private(None).unwrap();
        is_zero(&mut cs, x.into(), "z").unwrap();
        assert_eq!(cs.num_constraints(), 2);
        assert_eq!(cs.num_private(), 3);
    }
}
