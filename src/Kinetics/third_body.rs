//! Effective third-body concentrations.
//!
//! For reaction i with efficiencies e_k and default efficiency d:
//! M_i = Σ_k e_k·C_k + d·(C_tot − Σ_k C_k), sums over the species listed in the efficiency map.
//! Species not present in the mechanism never reach this module, the registry drops them.
use sprs::{CsMat, TriMat};
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
struct ThirdBodyEntry {
    /// global reaction index
    reaction: usize,
    /// (species index, efficiency) in increasing species order
    efficiencies: Vec<(usize, f64)>,
    default_efficiency: f64,
    /// true if M enters the law of mass action as a reactant (three-body reactions),
    /// false if it only enters a rate expression (falloff reactions)
    mass_action: bool,
}

/// Third-body calculator for a disjoint subset of reactions. Each installed reaction
/// occupies one slot of the work vector passed to `update`.
#[derive(Clone, Debug, Default)]
pub struct ThirdBodyCalc {
    entries: Vec<ThirdBodyEntry>,
}

impl ThirdBodyCalc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// size of the work vector holding one effective concentration per slot
    pub fn work_size(&self) -> usize {
        self.entries.len()
    }

    pub fn reactions(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|e| e.reaction)
    }

    /// slots are appended, `slot` must be equal to the number of installed reactions
    pub fn install(
        &mut self,
        slot: usize,
        efficiencies: &BTreeMap<usize, f64>,
        default_efficiency: f64,
        reaction: usize,
        mass_action: bool,
    ) {
        debug_assert_eq!(slot, self.entries.len());
        self.entries.push(ThirdBodyEntry {
            reaction,
            efficiencies: efficiencies.iter().map(|(k, e)| (*k, *e)).collect(),
            default_efficiency,
            mass_action,
        });
    }

    pub fn replace(&mut self, slot: usize, efficiencies: &BTreeMap<usize, f64>, default_efficiency: f64) {
        let entry = &mut self.entries[slot];
        entry.efficiencies = efficiencies.iter().map(|(k, e)| (*k, *e)).collect();
        entry.default_efficiency = default_efficiency;
    }

    /// work[slot] = effective third-body concentration
    pub fn update(&self, conc: &[f64], ctot: f64, work: &mut [f64]) {
        for (w, entry) in work.iter_mut().zip(self.entries.iter()) {
            let mut listed = 0.0;
            let mut weighted = 0.0;
            for (k, eff) in &entry.efficiencies {
                listed += conc[*k];
                weighted += eff * conc[*k];
            }
            *w = weighted + entry.default_efficiency * (ctot - listed);
        }
    }

    /// scatter slot values to the per-reaction vector `concm`
    pub fn copy(&self, work: &[f64], concm: &mut [f64]) {
        for (w, entry) in work.iter().zip(self.entries.iter()) {
            concm[entry.reaction] = *w;
        }
    }

    /// multiply rates of mass-action reactions by their effective concentration,
    /// `concm` is indexed by reaction
    pub fn multiply(&self, rop: &mut [f64], concm: &[f64]) {
        for entry in self.entries.iter().filter(|e| e.mass_action) {
            rop[entry.reaction] *= concm[entry.reaction];
        }
    }

    /// out[i] += input[i] for mass-action reactions: M contributes order one
    pub fn scale_order(&self, input: &[f64], out: &mut [f64]) {
        for entry in self.entries.iter().filter(|e| e.mass_action) {
            out[entry.reaction] += input[entry.reaction];
        }
    }

    /// add sign·product[i]·∂M_i/∂C_k for mass-action reactions to the triplet matrix
    pub fn jacobian_into(&self, product: &[f64], n_species: usize, sign: f64, tri: &mut TriMat<f64>) {
        for entry in self.entries.iter().filter(|e| e.mass_action) {
            let i = entry.reaction;
            let scale = sign * product[i];
            let mut next = 0;
            for k in 0..n_species {
                let eff = match entry.efficiencies.get(next) {
                    Some(&(kk, e)) if kk == k => {
                        next += 1;
                        e
                    }
                    _ => entry.default_efficiency,
                };
                if eff != 0.0 {
                    tri.add_triplet(i, k, scale * eff);
                }
            }
        }
    }

    /// ∂(product[i]·M_i)/∂C_k as a sparse n_reactions × n_species matrix
    pub fn jacobian(&self, product: &[f64], n_species: usize) -> CsMat<f64> {
        let mut tri = TriMat::new((product.len(), n_species));
        self.jacobian_into(product, n_species, 1.0, &mut tri);
        tri.to_csr()
    }
}
