use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::dto::invoice_dto::{
    InvoiceCustomer, InvoiceLine, InvoiceMechanic, InvoiceResponse, InvoiceService, InvoiceVehicleInfo,
};
use crate::repositories::JobRepository;
use crate::services::invoice_calculator::{compute_totals, invoice_number, round_cents, PartLine};
use crate::store::RecordStore;
use crate::utils::errors::{not_found_error, AppResult};

pub struct InvoiceController {
    jobs: JobRepository,
}

impl InvoiceController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            jobs: JobRepository::new(store),
        }
    }

    /// Factura de un trabajo: servicio + piezas + 10 % de impuesto
    pub async fn get(&self, job_id: Uuid) -> AppResult<InvoiceResponse> {
        let source = self
            .jobs
            .find_for_invoice(job_id)
            .await?
            .ok_or_else(|| not_found_error("Job", &job_id.to_string()))?;

        let base_price = source
            .service
            .as_ref()
            .map(|s| s.base_price)
            .unwrap_or(Decimal::ZERO);
        let part_lines: Vec<PartLine> = source
            .parts
            .iter()
            .map(|line| PartLine {
                price_at_time: line.job_part.price_at_time,
                quantity: line.job_part.quantity,
            })
            .collect();
        let totals = compute_totals(base_price, &part_lines).rounded();

        let lines = source
            .parts
            .iter()
            .zip(&part_lines)
            .map(|(line, priced)| InvoiceLine {
                part_name: line.part.as_ref().map(|p| p.name.clone()),
                quantity: priced.quantity,
                unit_price: round_cents(priced.price_at_time),
                amount: round_cents(priced.amount()),
            })
            .collect();

        let customer = source
            .vehicle
            .as_ref()
            .and_then(|v| v.customer.as_ref())
            .map(|c| InvoiceCustomer {
                name: c.name.clone(),
                email: c.email.clone(),
                phone: c.phone.clone(),
                address: c.address.clone(),
            });

        Ok(InvoiceResponse {
            invoice_number: invoice_number(source.job.id),
            job_id: source.job.id,
            status: source.job.status,
            completed_at: source.job.completed_at,
            notes: source.job.notes.clone(),
            customer,
            vehicle: source.vehicle.as_ref().map(|v| InvoiceVehicleInfo {
                year: v.year,
                make: v.make.clone(),
                model: v.model.clone(),
                license_plate: v.license_plate.clone(),
            }),
            service: source.service.as_ref().map(|s| InvoiceService {
                name: s.name.clone(),
                base_price: round_cents(s.base_price),
            }),
            mechanic: source.mechanic.as_ref().map(|m| InvoiceMechanic {
                name: m.name.clone(),
                hourly_rate: m.hourly_rate.map(round_cents),
            }),
            lines,
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
        })
    }
}
