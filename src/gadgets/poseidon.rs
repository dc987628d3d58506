//! Poseidon commitment as R1CS constraints.
//!
//! Mirrors [`crate::poseidon::commit`] step for step, with the same circom
//! parameter sets. Round constants and the MDS layer are linear and stay
//! inside linear combinations; each S-box costs three constraints (`x^2`,
//! `x^4`, `x^5`).

use crate::constraint_system::ConstraintSystem;
use crate::errors::{CommitmentError, R1CSError};
use crate::linear_combination::{LinearCombination, Variable};
use crate::poseidon::{PoseidonParams, MAX_ARITY};

fn synthesize_sbox(
    cs: &mut ConstraintSystem,
    x: LinearCombination,
    label: &str,
) -> Result<Variable, R1CSError> {
    let x_val = cs.eval(&x);
    let x2 = cs.alloc_private(x_val.map(|v| v.square()))?;
    let x4 = cs.alloc_private(x_val.map(|v| v.square().square()))?;
    let x5 = cs.alloc_private(x_val.map(|v| v.square().square() * v))?;

    cs.enforce(format!("{label}: x^2"), x.clone(), x.clone(), x2);
    cs.enforce(format!("{label}: x^4"), x2, x2, x4);
    cs.enforce(format!("{label}: x^5"), x4, x, x5);
    Ok(x5)
}

pub(crate) fn permutation_constraints(
    cs: &mut ConstraintSystem,
    params: &PoseidonParams,
    mut state: Vec<LinearCombination>,
    label: &str,
) -> Result<Vec<LinearCombination>, R1CSError> {
    if state.len() != params.width {
        return Err(R1CSError::LengthMismatch {
            what: "poseidon state",
            expected: params.width,
            actual: state.len(),
        });
    }

    for round in 0..params.total_rounds() {
        for (s, c) in state.iter_mut().zip(&params.round_constants[round]) {
            *s = std::mem::take(s) + *c;
        }

        let sbox_lanes = if params.is_full_round(round) { params.width } else { 1 };
        for lane in 0..sbox_lanes {
            let input = std::mem::take(&mut state[lane]);
            let out = synthesize_sbox(cs, input, &format!("{label} round {round} lane {lane}"))?;
            state[lane] = out.into();
        }

        state = params
            .mds
            .iter()
            .map(|row| {
                row.iter()
                    .zip(state.iter())
                    .fold(LinearCombination::zero(), |acc, (m, s)| acc + s.clone() * *m)
                    .compact()
            })
            .collect();
    }
    Ok(state)
}

/// `Poseidon(n)` over `1..=MAX_ARITY` values: zero domain tag in lane 0,
/// the values in lanes `1..=n`, lane 0 out.
fn hash(
    cs: &mut ConstraintSystem,
    values: &[LinearCombination],
    label: &str,
) -> Result<LinearCombination, R1CSError> {
    let params = PoseidonParams::circom(values.len())?;
    let mut state = Vec::with_capacity(params.width);
    state.push(LinearCombination::zero());
    state.extend(values.iter().cloned());

    let mut state = permutation_constraints(cs, &params, state, label)?;
    Ok(state.swap_remove(0))
}

fn commit_labelled(
    cs: &mut ConstraintSystem,
    values: &[LinearCombination],
    label: &str,
) -> Result<LinearCombination, R1CSError> {
    match values.len() {
        0 => Err(CommitmentError::Empty.into()),
        n if n <= MAX_ARITY => hash(cs, values, label),
        _ => {
            let digests = values
                .chunks(MAX_ARITY)
                .enumerate()
                .map(|(i, chunk)| hash(cs, chunk, &format!("{label}[{i}]")))
                .collect::<Result<Vec<_>, _>>()?;
            commit_labelled(cs, &digests, &format!("{label}/digests"))
        }
    }
}

/// In-circuit commitment to `values`; the result equals
/// `poseidon::commit(values)` on any satisfying assignment.
pub fn commit(
    cs: &mut ConstraintSystem,
    values: &[LinearCombination],
) -> Result<LinearCombination, R1CSError> {
    commit_labelled(cs, values, "poseidon")
}
