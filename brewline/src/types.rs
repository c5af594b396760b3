use std::fmt;
use std::time::Instant;

/// Payment methods accepted at the cash register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    Cash,
    Credit,
}

impl PaymentMethod {
    /// All supported payment methods.
    pub const ALL: [PaymentMethod; 2] = [PaymentMethod::Cash, PaymentMethod::Credit];
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => f.write_str("cash"),
            PaymentMethod::Credit => f.write_str("credit"),
        }
    }
}

/// Coffee kinds the machines can pour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoffeeKind {
    Espresso,
    Latte,
    Macchiato,
    Cappuccino,
}

impl CoffeeKind {
    /// All coffee kinds on the menu.
    pub const ALL: [CoffeeKind; 4] = [
        CoffeeKind::Espresso,
        CoffeeKind::Latte,
        CoffeeKind::Macchiato,
        CoffeeKind::Cappuccino,
    ];
}

impl fmt::Display for CoffeeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoffeeKind::Espresso => f.write_str("Espresso"),
            CoffeeKind::Latte => f.write_str("Latte"),
            CoffeeKind::Macchiato => f.write_str("Macchiato"),
            CoffeeKind::Cappuccino => f.write_str("Cappuccino"),
        }
    }
}

/// A cup, empty until a machine fills it.
#[derive(Debug, Default)]
pub struct Cup {
    brew: Option<CoffeeKind>,
}

impl Cup {
    /// Returns an empty cup.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fills the cup with the poured brew.
    pub(crate) fn fill(&mut self, brew: CoffeeKind) {
        self.brew = Some(brew);
    }

    /// Returns the brew in the cup, if it was filled.
    pub fn brew(&self) -> Option<CoffeeKind> {
        self.brew
    }
}

/// One customer flowing through the selection, payment and dispense stages.
///
/// A customer is owned by exactly one worker task at a time or sits in a stage
/// queue awaiting pickup; the queue handoff is the only synchronization point,
/// so the fields need no locking.
#[derive(Debug)]
pub struct Customer {
    payment: PaymentMethod,
    selection: Option<CoffeeKind>,
    service_start: Option<Instant>,
}

impl Customer {
    /// Creates a customer who will pay with the given method.
    pub fn new(payment: PaymentMethod) -> Self {
        Self {
            payment,
            selection: None,
            service_start: None,
        }
    }

    /// The payment method this customer uses at the register.
    pub fn payment(&self) -> PaymentMethod {
        self.payment
    }

    /// Stamps the service start time. Called once when the customer enters
    /// the selection stage.
    pub fn mark_service_start(&mut self) {
        self.service_start = Some(Instant::now());
    }

    /// The instant this customer entered the pipeline.
    pub fn service_start(&self) -> Option<Instant> {
        self.service_start
    }

    /// Records the chosen coffee. Written once, by the selection task that
    /// owns the customer, before the first handoff.
    pub fn select(&mut self, brew: CoffeeKind) {
        self.selection = Some(brew);
    }

    /// The coffee this customer selected, if the selection stage ran.
    pub fn selection(&self) -> Option<CoffeeKind> {
        self.selection
    }
}
