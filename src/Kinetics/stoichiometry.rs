//! Stoichiometric bookkeeping: which species take part in which reaction, with which
//! stoichiometric coefficient and with which reaction order.
//!
//! One manager describes one side of a set of reactions. Concentration products
//! Π_k C_k^order_k, their derivatives and stoichiometric sums Σ_k ν_k·g_k are computed here.
use crate::Thermodynamics::thermo_state::SMALL_NUMBER;
use sprs::{CsMat, TriMat};

#[derive(Clone, Debug, PartialEq)]
pub struct StoichTerm {
    pub species: usize,
    pub stoich: f64,
    pub order: f64,
}

#[derive(Clone, Debug)]
struct StoichEntry {
    reaction: usize,
    terms: Vec<StoichTerm>,
    sum_order: f64,
}

#[derive(Clone, Debug, Default)]
pub struct StoichManager {
    entries: Vec<StoichEntry>,
}

fn power(c: f64, order: f64) -> f64 {
    if order == 1.0 {
        c
    } else if order == 2.0 {
        c * c
    } else {
        c.powf(order)
    }
}

impl StoichManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// register one side of reaction `reaction`
    pub fn add(&mut self, reaction: usize, terms: Vec<StoichTerm>) {
        let sum_order = terms.iter().map(|t| t.order).sum();
        self.entries.push(StoichEntry {
            reaction,
            terms,
            sum_order,
        });
    }

    /// terms of reaction `reaction`, if it is described by this manager
    pub fn terms(&self, reaction: usize) -> Option<&[StoichTerm]> {
        self.entries
            .iter()
            .find(|e| e.reaction == reaction)
            .map(|e| e.terms.as_slice())
    }

    /// rates[i] *= Π_k conc_k^order_k
    pub fn multiply(&self, conc: &[f64], rates: &mut [f64]) {
        for entry in &self.entries {
            let product: f64 = entry
                .terms
                .iter()
                .map(|t| power(conc[t.species], t.order))
                .product();
            rates[entry.reaction] *= product;
        }
    }

    /// out[i] = input[i]·Σ_k order_k
    pub fn scale(&self, input: &[f64], out: &mut [f64]) {
        for entry in &self.entries {
            out[entry.reaction] = input[entry.reaction] * entry.sum_order;
        }
    }

    /// out[i] += Σ_k ν_k·g_k
    pub fn increment_reactions(&self, g: &[f64], out: &mut [f64]) {
        for entry in &self.entries {
            out[entry.reaction] += entry.terms.iter().map(|t| t.stoich * g[t.species]).sum::<f64>();
        }
    }

    /// out[i] -= Σ_k ν_k·g_k
    pub fn decrement_reactions(&self, g: &[f64], out: &mut [f64]) {
        for entry in &self.entries {
            out[entry.reaction] -= entry.terms.iter().map(|t| t.stoich * g[t.species]).sum::<f64>();
        }
    }

    /// add sign·rates[i]·∂(Π_j conc_j^order_j)/∂conc_k to the triplet matrix
    pub fn jacobian_into(&self, conc: &[f64], rates: &[f64], sign: f64, tri: &mut TriMat<f64>) {
        for entry in &self.entries {
            let i = entry.reaction;
            for (n, term) in entry.terms.iter().enumerate() {
                let c = conc[term.species];
                // fractional orders below one diverge at zero concentration
                let derivative = if term.order < 1.0 {
                    term.order * c.max(SMALL_NUMBER).powf(term.order - 1.0)
                } else {
                    term.order * power(c, term.order - 1.0)
                };
                let others: f64 = entry
                    .terms
                    .iter()
                    .enumerate()
                    .filter(|(m, _)| *m != n)
                    .map(|(_, t)| power(conc[t.species], t.order))
                    .product();
                let value = sign * rates[i] * derivative * others;
                if value != 0.0 {
                    tri.add_triplet(i, term.species, value);
                }
            }
        }
    }

    /// sparse n_reactions × n_species matrix of rates[i]·∂(Π conc^order)/∂conc_k
    pub fn jacobian(&self, conc: &[f64], rates: &[f64], n_species: usize) -> CsMat<f64> {
        let mut tri = TriMat::new((rates.len(), n_species));
        self.jacobian_into(conc, rates, 1.0, &mut tri);
        tri.to_csr()
    }
}
