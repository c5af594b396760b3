use rand::Rng;

use crate::types::{Customer, PaymentMethod};

/// Simulates shop load: produces batches of randomized customers to feed the
/// pipeline.
#[derive(Debug, Default)]
pub struct CustomerGenerator;

impl CustomerGenerator {
    /// Generates `amount` customers with uniformly random payment methods.
    pub fn generate(&self, amount: usize) -> Vec<Customer> {
        let mut rng = rand::thread_rng();

        (0..amount)
            .map(|_| {
                let payment = PaymentMethod::ALL[rng.gen_range(0..PaymentMethod::ALL.len())];
                Customer::new(payment)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_the_requested_amount() {
        let customers = CustomerGenerator::default().generate(42);

        assert_eq!(customers.len(), 42);
        for customer in &customers {
            assert!(customer.selection().is_none());
            assert!(customer.service_start().is_none());
        }
    }
}
