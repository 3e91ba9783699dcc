//! Cálculo de facturas
//!
//! subtotal = precio base del servicio + Σ(precio congelado × cantidad)
//! impuesto = subtotal × 10 %
//! total    = subtotal + impuesto
//!
//! Aritmética decimal exacta; solo se redondea a 2 decimales al presentar,
//! y el total presentado es la suma de los importes ya redondeados.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use uuid::Uuid;

/// Tipo impositivo fijo (10 %)
pub const TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Línea de pieza tal como quedó asociada al trabajo
#[derive(Debug, Clone, PartialEq)]
pub struct PartLine {
    pub price_at_time: Decimal,
    pub quantity: i32,
}

impl PartLine {
    pub fn amount(&self) -> Decimal {
        self.price_at_time * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl InvoiceTotals {
    /// Importes redondeados a céntimos para mostrar
    pub fn rounded(&self) -> Self {
        let subtotal = round_cents(self.subtotal);
        let tax = round_cents(self.tax);
        Self {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn compute_totals(base_price: Decimal, parts: &[PartLine]) -> InvoiceTotals {
    let parts_total: Decimal = parts.iter().map(PartLine::amount).sum();
    let subtotal = base_price + parts_total;
    let tax = subtotal * TAX_RATE;
    InvoiceTotals {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}

/// Número de factura: primeros 8 caracteres del id del trabajo, en mayúsculas
pub fn invoice_number(job_id: Uuid) -> String {
    job_id.to_string().chars().take(8).collect::<String>().to_uppercase()
}
