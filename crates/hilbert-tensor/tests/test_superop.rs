//! Superoperators built from functions and applied to density operators.

use approx::assert_relative_eq;
use hilbert_tensor::circuits::{cnot, pauli_z};
use hilbert_tensor::persist::{self, Persist};
use hilbert_tensor::{HilbertArray, HilbertError, HilbertSpace, Superoperator, c64, qubit, qudit};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn test_partial_trace_channel() {
    let a = qubit("ta").unwrap();
    let b = qudit("tb", 3).unwrap();
    let ab = a.space().product(&b.space()).unwrap();
    let tr_b = Superoperator::<c64>::from_function(&ab, |x| x.trace(&[b.clone()])).unwrap();
    assert_eq!(tr_b.in_space(), &ab);
    assert_eq!(tr_b.out_space(), &a.space());
    assert_eq!(tr_b.matrix().nrows(), 4);
    assert_eq!(tr_b.matrix().ncols(), 36);

    let mut rng = StdRng::seed_from_u64(4);
    let rho = ab.o().random_density_with_rng::<c64, _>(&mut rng).unwrap();
    let direct = rho.trace(&[b]).unwrap();
    assert!(tr_b.apply(&rho).unwrap().approx_eq(&direct, 1e-12));
}

#[test]
fn test_unitary_conjugation_and_adjoint() {
    let a = qubit("ua").unwrap();
    let b = qubit("ub").unwrap();
    let ab = a.space().product(&b.space()).unwrap();
    let u = cnot::<c64>(&a, &b).unwrap();
    let conj = Superoperator::from_function(&ab, |x| &(&u * x)? * &u.adjoint()).unwrap();

    let mut rng = StdRng::seed_from_u64(12);
    let rho = ab.o().random_density_with_rng::<c64, _>(&mut rng).unwrap();
    let once = conj.apply(&rho).unwrap();
    assert_relative_eq!(once.trace_full().unwrap().re, 1.0, epsilon = 1e-12);

    // a unitary channel's dual is its inverse
    let undone = conj.adjoint().apply(&once).unwrap();
    assert!(undone.approx_eq(&rho, 1e-12));
}

#[test]
fn test_compose_passes_through_extra_inputs() {
    let a = qubit("ca").unwrap();
    let b = qubit("cb").unwrap();
    let z = pauli_z::<c64>(&a).unwrap();
    let dephase = Superoperator::<c64>::from_function(&a.space(), |x| {
        let zxz = (&(&z * x)? * &z)?;
        Ok(&(x + &zxz)? * c64::new(0.5, 0.0))
    })
    .unwrap();
    let ab = a.space().product(&b.space()).unwrap();
    let tr_b = Superoperator::<c64>::from_function(&ab, |x| x.trace(&[b.clone()])).unwrap();

    let both = dephase.compose(&tr_b).unwrap();
    assert_eq!(both.in_space(), &ab);
    assert_eq!(both.to_string(), "Superoperator( |ca,cb><ca,cb| to |ca><ca| )");

    let mut rng = StdRng::seed_from_u64(30);
    let rho = ab.o().random_density_with_rng::<c64, _>(&mut rng).unwrap();
    let out = both.apply(&rho).unwrap();
    assert_relative_eq!(out.get(&[0, 1]).unwrap().norm(), 0.0, epsilon = 1e-12);
    let reduced = rho.trace(&[b]).unwrap();
    assert_relative_eq!(
        out.get(&[1, 1]).unwrap().re,
        reduced.get(&[1, 1]).unwrap().re,
        epsilon = 1e-12
    );
}

#[test]
fn test_apply_requires_the_domain() {
    let a = qubit("da").unwrap();
    let b = qubit("db").unwrap();
    let id = Superoperator::<c64>::identity(&a.o()).unwrap();
    let rho: HilbertArray<c64> = b.o().eye().unwrap();
    assert!(matches!(id.apply(&rho), Err(HilbertError::LabelMismatch(_))));

    let bad = HilbertSpace::combine(&[a.clone(), b.h()]).unwrap();
    assert!(matches!(
        Superoperator::<c64>::identity(&bad),
        Err(HilbertError::LabelMismatch(_))
    ));
}

#[test]
fn test_persisted_array_feeds_a_superoperator() {
    let a = qubit("pa").unwrap();
    let mut rng = StdRng::seed_from_u64(77);
    let rho = a.o().random_density_with_rng::<c64, _>(&mut rng).unwrap();
    let json = persist::to_json(&rho).unwrap();
    let loaded = HilbertArray::<c64>::from_json(&json).unwrap();
    let t = Superoperator::<c64>::transposer(&a.space()).unwrap();
    assert!(t.apply(&loaded).unwrap().approx_eq(&rho.transpose(None).unwrap(), 1e-12));

    let stale = json.replace("\"format_version\":2", "\"format_version\":3");
    assert!(matches!(
        HilbertArray::<c64>::from_json(&stale),
        Err(HilbertError::UnsupportedFormat { found: 3, expected: 2 })
    ));
}
