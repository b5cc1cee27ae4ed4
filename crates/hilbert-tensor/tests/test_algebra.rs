//! Array algebra over labeled spaces: construction, contraction, traces and
//! relabeling.

use approx::assert_relative_eq;
use hilbert_tensor::{
    BaseField, Direction, HilbertArray, HilbertAtom, HilbertError, HilbertSpace, c64, qubit, qudit,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn c(re: f64) -> c64 {
    c64::new(re, 0.0)
}

#[test]
fn test_atoms_are_memoized() {
    let field = BaseField::complex();
    let a1 = HilbertAtom::new("mem", 2, Direction::Ket, &field).unwrap();
    let a2 = qubit("mem").unwrap();
    assert!(a1.same_instance(&a2));
    assert!(a1.h().h().same_instance(&a1));
    assert!(!a1.same_instance(&qudit("mem", 3).unwrap()));
}

#[test]
fn test_space_is_order_independent() {
    let a = qubit("oa").unwrap();
    let b = qudit("ob", 3).unwrap();
    let s1 = HilbertSpace::combine(&[a.clone(), b.h(), b.clone()]).unwrap();
    let s2 = HilbertSpace::combine(&[b.clone(), a.clone(), b.h()]).unwrap();
    assert!(s1.same_instance(&s2));
    assert_eq!(s1.to_string(), "|oa,ob><ob|");
    assert_eq!(s1.shape(), &[2, 3, 3]);
    assert!(matches!(
        HilbertSpace::combine(&[a.clone(), a.clone()]),
        Err(HilbertError::DuplicateAxis { .. })
    ));
}

#[test]
fn test_index_iter_round_trip() {
    let a = qubit("ia").unwrap();
    let b = qudit("ib", 3).unwrap();
    let s = HilbertSpace::combine(&[a.clone(), b.h()]).unwrap();
    let data: Vec<c64> = (0..s.dim()).map(|i| c(i as f64)).collect();
    let x = s.array(data.clone()).unwrap();
    let walked: Vec<c64> = s.index_iter().map(|idx| x.get(&idx).unwrap()).collect();
    assert_eq!(walked, data);
}

#[test]
fn test_pauli_x_squares_to_identity() {
    let a = qubit("px").unwrap();
    let x = a.o().array(vec![c(0.0), c(1.0), c(1.0), c(0.0)]).unwrap();
    let xx = (&x * &x).unwrap();
    assert_eq!(xx, a.o().eye::<c64>().unwrap());
}

#[test]
fn test_contraction_is_associative() {
    let a = qubit("aa").unwrap();
    let b = qudit("ab", 3).unwrap();
    let mut rng = StdRng::seed_from_u64(17);
    let ab = a.space().product(&b.h().space()).unwrap();
    let x = ab.random_array_with_rng::<c64, _>(&mut rng).unwrap();
    let y = b.o().random_array_with_rng::<c64, _>(&mut rng).unwrap();
    let z = b.space().random_array_with_rng::<c64, _>(&mut rng).unwrap();

    let left = (&(&x * &y).unwrap() * &z).unwrap();
    let right = (&x * &(&y * &z).unwrap()).unwrap();
    assert_eq!(left.space(), &a.space());
    assert!(left.approx_eq(&right, 1e-12));
}

#[test]
fn test_trace_of_3x3() {
    let real = BaseField::real();
    let a = HilbertAtom::ket("tr", 3, &real).unwrap();
    let x = HilbertArray::new(&a.o(), (1..=9).map(f64::from).collect()).unwrap();
    assert_relative_eq!(x.trace_full().unwrap(), 15.0);
    let partial = x.trace(&[a.clone()]).unwrap();
    assert!(partial.space().is_empty());
    assert_relative_eq!(partial.to_scalar().unwrap(), 15.0);
}

#[test]
fn test_relabel_is_a_bijection() {
    let a = qubit("la").unwrap();
    let b = qubit("lb").unwrap();
    let s = a.space().product(&b.o()).unwrap();
    let x = s.array((0..s.dim()).map(|i| c(i as f64)).collect()).unwrap();
    let y = x.relabel(&[("la", "lz"), ("lb", "la")]).unwrap();
    assert_eq!(y.space().to_string(), "|la,lz><la|");
    let back = y.relabel(&[("la", "lb"), ("lz", "la")]).unwrap();
    assert_eq!(back, x);
}

#[test]
fn test_explicit_contraction_label_must_be_shared() {
    let a = qubit("ea").unwrap();
    let b = qubit("eb").unwrap();
    let x = a.o().eye::<c64>().unwrap();
    let y = b.o().eye::<c64>().unwrap();
    assert!(matches!(
        x.contract(&y, Some(&[a.clone()])),
        Err(HilbertError::LabelMismatch(_))
    ));
    let outer = x.contract(&y, None).unwrap();
    assert_eq!(outer.space().to_string(), "|ea,eb><ea,eb|");
}

#[test]
fn test_mismatched_field_spaces() {
    let a = qubit("fa").unwrap();
    let r = a.with_field(&BaseField::real());
    assert!(matches!(
        HilbertSpace::combine(&[a, r]),
        Err(HilbertError::IncompatibleField { .. })
    ));
}

#[test]
fn test_density_operator_partial_trace_is_normalized() {
    let a = qubit("da").unwrap();
    let b = qudit("db", 3).unwrap();
    let s = a.space().product(&b.space()).unwrap();
    let mut rng = StdRng::seed_from_u64(23);
    let rho = s.o().random_density_with_rng::<c64, _>(&mut rng).unwrap();
    let reduced = rho.trace(&[b]).unwrap();
    assert_eq!(reduced.space(), &a.o());
    assert_relative_eq!(reduced.trace_full().unwrap().re, 1.0, epsilon = 1e-12);
    assert!(reduced.is_hermitian(1e-12));
}
