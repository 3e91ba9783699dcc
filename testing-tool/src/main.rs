use anyhow::{anyhow, Result};
use colored::*;
use serde_json::{json, Value};
use std::io::{self, Write};

#[tokio::main]
async fn main() -> Result<()> {
    println!("{}", "🔧 Garage Dashboard Testing Tool".bright_blue().bold());
    println!("{}", "=================================".bright_blue());
    println!();

    let base_url = ask("URL del servidor (por defecto http://localhost:3000): ")?;
    let base_url = if base_url.is_empty() {
        "http://localhost:3000".to_string()
    } else {
        base_url.trim_end_matches('/').to_string()
    };
    let client = ApiClient::new(base_url);

    loop {
        println!();
        println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
        println!("{}", "==================".bright_green());
        println!("1. ❤️  Health check");
        println!("2. 📊 Ver dashboard");
        println!("3. 📅 Ver agenda semanal");
        println!("4. 🧾 Ver factura de un trabajo");
        println!("5. 🚀 Flujo completo (alta, trabajo, piezas, factura)");
        println!("6. 🚪 Salir");

        match ask("Selecciona una opción (1-6): ")?.as_str() {
            "1" => print_result(client.get("/health").await),
            "2" => print_result(client.get("/api/dashboard").await),
            "3" => {
                let date = ask("Fecha YYYY-MM-DD (vacío = hoy): ")?;
                let path = if date.is_empty() {
                    "/api/schedule".to_string()
                } else {
                    format!("/api/schedule?date={}", date)
                };
                print_result(client.get(&path).await);
            }
            "4" => {
                let job_id = ask("ID del trabajo: ")?;
                print_result(client.get(&format!("/api/jobs/{}/invoice", job_id)).await);
            }
            "5" => {
                if let Err(e) = full_flow(&client).await {
                    println!("{}", format!("❌ Flujo interrumpido: {}", e).bright_red());
                }
            }
            "6" => {
                println!("{}", "👋 ¡Hasta luego!".bright_green());
                break;
            }
            _ => println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red()),
        }
    }

    Ok(())
}

fn ask(prompt: &str) -> Result<String> {
    print!("{}", prompt.bright_yellow());
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn print_result(result: Result<Value>) {
    match result {
        Ok(body) => match serde_json::to_string_pretty(&body) {
            Ok(pretty) => println!("{}", pretty),
            Err(_) => println!("{}", body),
        },
        Err(e) => println!("{}", format!("❌ {}", e).bright_red()),
    }
}

/// Recorre la API de punta a punta con datos de prueba
async fn full_flow(client: &ApiClient) -> Result<()> {
    println!();
    println!("{}", "🚀 FLUJO COMPLETO".bright_cyan().bold());
    println!("{}", "==================".bright_cyan());

    let suffix = unique_suffix();
    let customer = client
        .post(
            "/api/customers",
            json!({
                "name": "Cliente de prueba",
                "phone": "600000000",
                "vehicle": {
                    "make": "Seat",
                    "model": "Ibiza",
                    "year": 2015,
                    "license_plate": format!("TEST-{}", suffix)
                }
            }),
        )
        .await?;
    let customer_id = data_id(&customer)?;
    println!("{} {}", "✅ Cliente creado:".bright_green(), customer_id);

    let detail = client.get(&format!("/api/customers/{}", customer_id)).await?;
    let vehicle_id = detail["vehicles"][0]["id"]
        .as_str()
        .ok_or_else(|| anyhow!("el cliente no tiene vehículo"))?
        .to_string();
    println!("{} {}", "✅ Vehículo:".bright_green(), vehicle_id);

    let service = client
        .post(
            "/api/services",
            json!({ "name": "Revisión", "estimated_hours": "1.0", "base_price": "100.00" }),
        )
        .await?;
    let mechanic = client
        .post(
            "/api/mechanics",
            json!({ "name": "Mecánico de prueba", "specialization": "General", "hourly_rate": "30.00" }),
        )
        .await?;
    let part = client
        .post(
            "/api/parts",
            json!({
                "name": "Filtro de aceite",
                "part_number": format!("FA-{}", suffix),
                "quantity": 10,
                "unit_price": "25.00",
                "reorder_point": 2
            }),
        )
        .await?;

    let job = client
        .post(
            "/api/jobs",
            json!({
                "vehicle_id": vehicle_id,
                "service_id": data_id(&service)?,
                "mechanic_id": data_id(&mechanic)?,
                "scheduled_date": "2024-05-15T09:00:00Z"
            }),
        )
        .await?;
    let job_id = data_id(&job)?;
    println!("{} {}", "✅ Trabajo creado:".bright_green(), job_id);

    client
        .post(
            &format!("/api/jobs/{}/parts", job_id),
            json!({ "part_id": data_id(&part)?, "quantity": 2 }),
        )
        .await?;
    client
        .patch(&format!("/api/jobs/{}/status", job_id), json!({ "status": "completed" }))
        .await?;
    println!("{}", "✅ Trabajo completado".bright_green());

    let invoice = client.get(&format!("/api/jobs/{}/invoice", job_id)).await?;
    println!("{}", "🧾 FACTURA:".bright_green().bold());
    println!("{}", serde_json::to_string_pretty(&invoice)?);
    println!(
        "{}",
        format!(
            "Subtotal {} · IVA {} · Total {} (esperado 150.00 · 15.00 · 165.00)",
            invoice["subtotal"], invoice["tax"], invoice["total"]
        )
        .bright_blue()
    );

    Ok(())
}

fn data_id(body: &Value) -> Result<String> {
    body["data"]["id"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("respuesta sin data.id: {}", body))
}

fn unique_suffix() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    format!("{}", secs % 1_000_000)
}

struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    async fn get(&self, path: &str) -> Result<Value> {
        let response = self.http.get(format!("{}{}", self.base_url, path)).send().await?;
        Self::read(response).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn patch(&self, path: &str, body: Value) -> Result<Value> {
        let response = self
            .http
            .patch(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn read(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        if status.is_success() {
            Ok(body)
        } else {
            Err(anyhow!("HTTP {}: {}", status, body))
        }
    }
}
