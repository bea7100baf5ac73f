use rayon::prelude::*;

use super::{MoistAirState, PartialState, PsychroError, Psychrometrics};

impl Psychrometrics {
    /// Resolves many partial states in parallel.
    ///
    /// Each element is resolved independently, so one failure does not
    /// affect the others. Results are returned in input order.
    pub fn resolve_batch(
        &self,
        partials: &[PartialState],
    ) -> Vec<Result<MoistAirState, PsychroError>> {
        partials
            .par_iter()
            .map(|partial| self.resolve(partial))
            .collect()
    }
}
