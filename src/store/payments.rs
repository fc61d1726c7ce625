//! Payment screenshots

use rusqlite::{params, OptionalExtension, Row};

use super::{Store, StoreError, StoreResult};
use crate::model::{PaymentScreenshot, PaymentStatus};

fn payment_from_row(row: &Row<'_>) -> rusqlite::Result<PaymentScreenshot> {
    Ok(PaymentScreenshot {
        id: row.get(0)?,
        team_id: row.get(1)?,
        image_url: row.get(2)?,
        public_id: row.get(3)?,
        status: row.get(4)?,
        uploaded_at: row.get(5)?,
    })
}

impl Store {
    pub fn insert_payment(&self, payment: &PaymentScreenshot) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO payments (id, team_id, image_url, public_id, status, uploaded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                payment.id,
                payment.team_id,
                payment.image_url,
                payment.public_id,
                payment.status,
                payment.uploaded_at
            ],
        )
        .map_err(|e| StoreError::from_write(e, &format!("Payment {}", payment.id)))?;
        Ok(())
    }

    pub fn get_payment(&self, id: &str) -> StoreResult<Option<PaymentScreenshot>> {
        let conn = self.conn()?;
        let payment = conn
            .query_row(
                "SELECT id, team_id, image_url, public_id, status, uploaded_at FROM payments WHERE id = ?1",
                params![id],
                payment_from_row,
            )
            .optional()?;
        Ok(payment)
    }

    /// Newest uploads first
    pub fn list_payments(&self, team_id: Option<&str>) -> StoreResult<Vec<PaymentScreenshot>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, team_id, image_url, public_id, status, uploaded_at FROM payments
             WHERE (?1 IS NULL OR team_id = ?1)
             ORDER BY uploaded_at DESC, id",
        )?;
        let payments = stmt
            .query_map(params![team_id], payment_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(payments)
    }

    pub fn set_payment_status(
        &self,
        id: &str,
        status: PaymentStatus,
    ) -> StoreResult<PaymentScreenshot> {
        {
            let conn = self.conn()?;
            let changed = conn.execute(
                "UPDATE payments SET status = ?2 WHERE id = ?1",
                params![id, status],
            )?;
            if changed == 0 {
                return Err(StoreError::not_found("Payment", id));
            }
        }

        tracing::info!(payment_id = %id, status = %status, "Payment status changed");
        self.get_payment(id)?
            .ok_or_else(|| StoreError::not_found("Payment", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{new_id, Team};

    fn payment(team_id: &str, uploaded_at: i64) -> PaymentScreenshot {
        PaymentScreenshot {
            id: new_id(),
            team_id: team_id.to_string(),
            image_url: format!("https://media.example/{}.png", uploaded_at),
            public_id: Some(format!("hackathon_payments/{}", uploaded_at)),
            status: PaymentStatus::Pending,
            uploaded_at,
        }
    }

    #[test]
    fn test_insert_and_list_newest_first() {
        let store = Store::open_in_memory().unwrap();
        let team = Team::new("Payers");
        store.insert_team(&team).unwrap();

        let older = payment(&team.id, 100);
        let newer = payment(&team.id, 200);
        store.insert_payment(&older).unwrap();
        store.insert_payment(&newer).unwrap();

        let listed = store.list_payments(Some(team.id.as_str())).unwrap();
        assert_eq!(listed, vec![newer, older]);
        assert!(store.list_payments(Some("other")).unwrap().is_empty());
    }

    #[test]
    fn test_set_status() {
        let store = Store::open_in_memory().unwrap();
        let team = Team::new("Payers");
        store.insert_team(&team).unwrap();
        let p = payment(&team.id, 1);
        store.insert_payment(&p).unwrap();

        let updated = store.set_payment_status(&p.id, PaymentStatus::Verified).unwrap();
        assert_eq!(updated.status, PaymentStatus::Verified);

        let err = store
            .set_payment_status("missing", PaymentStatus::Rejected)
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "Payment", .. }));
    }
}
