//! Text and LaTeX presentation of arrays.
//!
//! `Display` prints the space on one line followed by the matrix view, one
//! bracketed row per ket index. A precision (`{:.3}`) applies to every
//! entry.

use std::fmt::{self, Write};

use crate::array::HilbertArray;
use crate::atom::HilbertAtom;
use crate::field::FieldKind;
use crate::scalar::Scalar;
use crate::space::HilbertSpace;

fn format_entry<T: Scalar>(x: T, precision: Option<usize>, imag_unit: &str) -> String {
    let num = |v: f64| match precision {
        Some(p) => format!("{:.*}", p, v),
        None => format!("{}", v),
    };
    let (re, im) = (x.re_part(), x.im_part());
    if T::KIND == FieldKind::Real || im == 0.0 {
        return num(re);
    }
    if re == 0.0 {
        return format!("{}{}", num(im), imag_unit);
    }
    let sign = if im < 0.0 { '-' } else { '+' };
    format!("{}{}{}{}", num(re), sign, num(im.abs()), imag_unit)
}

fn rows<T: Scalar>(array: &HilbertArray<T>, precision: Option<usize>, imag_unit: &str) -> Vec<Vec<String>> {
    let cols = array.space().bra_dim();
    array
        .data()
        .chunks(cols)
        .map(|row| row.iter().map(|&x| format_entry(x, precision, imag_unit)).collect())
        .collect()
}

impl<T: Scalar> fmt::Display for HilbertArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.space())?;
        let body = rows(self, f.precision(), "i");
        let width = body.iter().flatten().map(String::len).max().unwrap_or(0);
        for (i, row) in body.iter().enumerate() {
            let open = if i == 0 { "[[" } else { " [" };
            let close = if i + 1 == body.len() { "]]" } else { "]," };
            let cells: Vec<String> = row.iter().map(|c| format!("{:>width$}", c)).collect();
            write!(f, "{}{}{}", open, cells.join(", "), close)?;
            if i + 1 != body.len() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

fn latex_labels(atoms: &[HilbertAtom]) -> String {
    atoms
        .iter()
        .map(|a| a.label().replace('\'', "^\\prime"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Write the LaTeX form of a space,
/// `\left| a,b \right\rangle\left\langle c \right|`, into `out`.
pub fn write_latex_space<W: Write>(out: &mut W, space: &HilbertSpace) -> fmt::Result {
    if !space.kets().is_empty() || space.is_empty() {
        write!(out, "\\left| {} \\right\\rangle", latex_labels(space.kets()))?;
    }
    if !space.bras().is_empty() {
        write!(out, "\\left\\langle {} \\right|", latex_labels(space.bras()))?;
    }
    Ok(())
}

/// Write the LaTeX `pmatrix` of the matrix view, prefixed by the space.
pub fn write_latex<W: Write, T: Scalar>(out: &mut W, array: &HilbertArray<T>) -> fmt::Result {
    write_latex_space(out, array.space())?;
    out.write_str(" \\begin{pmatrix} ")?;
    for (i, row) in rows(array, None, "i").iter().enumerate() {
        if i > 0 {
            out.write_str(" \\\\ ")?;
        }
        out.write_str(&row.join(" & "))?;
    }
    out.write_str(" \\end{pmatrix}")
}

/// Display adapter over [`write_latex_space`].
pub struct LatexSpace<'a>(pub &'a HilbertSpace);

impl fmt::Display for LatexSpace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_latex_space(f, self.0)
    }
}

/// Display adapter over [`write_latex`].
pub struct Latex<'a, T: Scalar>(pub &'a HilbertArray<T>);

impl<T: Scalar> fmt::Display for Latex<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_latex(f, self.0)
    }
}

/// LaTeX form of a space as a string.
pub fn latex_space(space: &HilbertSpace) -> String {
    LatexSpace(space).to_string()
}

/// LaTeX `pmatrix` of the matrix view as a string.
///
/// ```
/// use hilbert_tensor::{c64, qubit, render};
///
/// let a = qubit("a").unwrap();
/// let x = a.o().eye::<c64>().unwrap();
/// assert_eq!(
///     render::latex(&x),
///     "\\left| a \\right\\rangle\\left\\langle a \\right| \
///      \\begin{pmatrix} 1 & 0 \\\\ 0 & 1 \\end{pmatrix}"
/// );
/// ```
pub fn latex<T: Scalar>(array: &HilbertArray<T>) -> String {
    Latex(array).to_string()
}
