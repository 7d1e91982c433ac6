//! # Profit Worksheet
//!
//! The profit split engine's working state: the sale lines entered for one
//! report date and the manual adjustment lines, from which both stakeholder
//! ledgers and the report totals are derived.
//!
//! ## Ledger Regeneration
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Split Ledger Rebuild                                │
//! │                                                                         │
//! │  phones ───┐                                                           │
//! │            │   Thabrew (computed, in order)                            │
//! │            ├──► 1. Phone Profit (80%)          Σ phone thabrew        │
//! │            ├──► 2. Accessories Profit (80%)    Σ accessory thabrew    │
//! │  accs  ────┤   3. Accessories Cost             Σ accessory cost       │
//! │            ├──► 4. one line per TB phone       that phone's cost      │
//! │            │   ── then manual Thabrew lines, verbatim ──              │
//! │            │                                                           │
//! │            │   Kelan (computed, in order)                              │
//! │            ├──► 1. Phone Profit (20%)          Σ phone kelan          │
//! │            └──► 2. Accessories Profit (20%)    Σ accessory kelan      │
//! │                ── then manual Kelan lines, verbatim ──                │
//! │                                                                         │
//! │  The computed subset is REGENERATED on every read.                     │
//! │  Manual lines are stored separately and appended at read time.         │
//! │  The two are never merged into one mutable list.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Accessory cost is charged entirely to the majority stakeholder, and a
//! TB-owned phone's acquisition cost is returned to them as a ledger line,
//! since they fronted it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::sale::{
    AccessorySale, AccessorySaleInput, PhoneSale, PhoneSaleInput, ProfitReport, ReportTotals,
    SplitLine,
};
use crate::validation::require;

// =============================================================================
// Ledger Line Labels
// =============================================================================
// Fixed descriptions for the computed lines, as they appear on saved reports.

pub const THABREW_PHONE_PROFIT: &str = "Phone Profit (80%)";
pub const THABREW_ACCESSORY_PROFIT: &str = "Accessories Profit (80%)";
pub const THABREW_ACCESSORY_COST: &str = "Accessories Cost";
pub const KELAN_PHONE_PROFIT: &str = "Phone Profit (20%)";
pub const KELAN_ACCESSORY_PROFIT: &str = "Accessories Profit (20%)";

// =============================================================================
// Worksheet
// =============================================================================

/// Working state for one profit report.
///
/// Mutations go through the `add_*`/`update_*`/`remove_*` methods, which
/// validate before touching the lists; reads (`thabrew_lines`,
/// `kelan_lines`, `totals`) are pure functions of the current state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worksheet {
    report_date: NaiveDate,
    phones: Vec<PhoneSale>,
    accessories: Vec<AccessorySale>,
    manual_thabrew: Vec<SplitLine>,
    manual_kelan: Vec<SplitLine>,
}

impl Worksheet {
    /// Creates an empty worksheet for the given report date.
    pub fn new(report_date: NaiveDate) -> Self {
        Worksheet {
            report_date,
            phones: Vec::new(),
            accessories: Vec::new(),
            manual_thabrew: Vec::new(),
            manual_kelan: Vec::new(),
        }
    }

    /// Reloads a saved report into working state for the edit-and-resave
    /// flow.
    ///
    /// Sale lines come back in full; of the ledger lines only the manual
    /// subset is reloaded as editable, since the computed subset regenerates
    /// from the sale lines.
    pub fn from_report(report: &ProfitReport) -> Self {
        Worksheet {
            report_date: report.report_date,
            phones: report.phone_entries.clone(),
            accessories: report.accessory_entries.clone(),
            manual_thabrew: report
                .thabrew_entries
                .iter()
                .filter(|l| l.manual)
                .cloned()
                .collect(),
            manual_kelan: report
                .kelan_entries
                .iter()
                .filter(|l| l.manual)
                .cloned()
                .collect(),
        }
    }

    #[inline]
    pub fn report_date(&self) -> NaiveDate {
        self.report_date
    }

    pub fn set_report_date(&mut self, date: NaiveDate) {
        self.report_date = date;
    }

    #[inline]
    pub fn phones(&self) -> &[PhoneSale] {
        &self.phones
    }

    #[inline]
    pub fn accessories(&self) -> &[AccessorySale] {
        &self.accessories
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.phones.is_empty()
            && self.accessories.is_empty()
            && self.manual_thabrew.is_empty()
            && self.manual_kelan.is_empty()
    }

    // =========================================================================
    // Sale Line Mutations
    // =========================================================================

    /// Validates and appends a phone sale line.
    pub fn add_phone(&mut self, input: PhoneSaleInput) -> CoreResult<&PhoneSale> {
        let sale = PhoneSale::new(input)?;
        self.phones.push(sale);
        Ok(self.phones.last().expect("just pushed"))
    }

    /// Validates and replaces the phone sale line at `index` in place.
    pub fn update_phone(&mut self, index: usize, input: PhoneSaleInput) -> CoreResult<&PhoneSale> {
        // Validate before mutating so a bad edit leaves the line untouched
        let sale = PhoneSale::new(input)?;
        let slot = self
            .phones
            .get_mut(index)
            .ok_or(CoreError::EntryNotFound { kind: "phone", index })?;
        *slot = sale;
        Ok(&self.phones[index])
    }

    /// Removes the phone sale line at `index`.
    pub fn remove_phone(&mut self, index: usize) -> CoreResult<PhoneSale> {
        if index >= self.phones.len() {
            return Err(CoreError::EntryNotFound { kind: "phone", index });
        }
        Ok(self.phones.remove(index))
    }

    /// Validates and appends an accessory sale line.
    pub fn add_accessory(&mut self, input: AccessorySaleInput) -> CoreResult<&AccessorySale> {
        let sale = AccessorySale::new(input)?;
        self.accessories.push(sale);
        Ok(self.accessories.last().expect("just pushed"))
    }

    /// Validates and replaces the accessory sale line at `index` in place.
    pub fn update_accessory(
        &mut self,
        index: usize,
        input: AccessorySaleInput,
    ) -> CoreResult<&AccessorySale> {
        let sale = AccessorySale::new(input)?;
        let slot = self.accessories.get_mut(index).ok_or(CoreError::EntryNotFound {
            kind: "accessory",
            index,
        })?;
        *slot = sale;
        Ok(&self.accessories[index])
    }

    /// Removes the accessory sale line at `index`.
    pub fn remove_accessory(&mut self, index: usize) -> CoreResult<AccessorySale> {
        if index >= self.accessories.len() {
            return Err(CoreError::EntryNotFound {
                kind: "accessory",
                index,
            });
        }
        Ok(self.accessories.remove(index))
    }

    // =========================================================================
    // Manual Ledger Lines
    // =========================================================================

    /// Appends a manual Thabrew adjustment line. Description is required;
    /// the amount may be zero or negative (deductions).
    pub fn add_manual_thabrew(&mut self, description: &str, amount: Money) -> CoreResult<()> {
        let description = require("description", description)?;
        self.manual_thabrew.push(SplitLine::manual(description, amount));
        Ok(())
    }

    /// Appends a manual Kelan adjustment line.
    pub fn add_manual_kelan(&mut self, description: &str, amount: Money) -> CoreResult<()> {
        let description = require("description", description)?;
        self.manual_kelan.push(SplitLine::manual(description, amount));
        Ok(())
    }

    /// Removes a Thabrew ledger line by its index in the combined list
    /// (as rendered).
    ///
    /// Computed lines occupy the leading indices and cannot be removed; they
    /// only disappear when the sale lines they derive from do.
    pub fn remove_thabrew_line(&mut self, index: usize) -> CoreResult<SplitLine> {
        let computed = self.computed_thabrew_count();
        if index < computed {
            return Err(CoreError::ComputedLineImmutable { index });
        }
        let manual_index = index - computed;
        if manual_index >= self.manual_thabrew.len() {
            return Err(CoreError::EntryNotFound {
                kind: "thabrew",
                index,
            });
        }
        Ok(self.manual_thabrew.remove(manual_index))
    }

    /// Removes a Kelan ledger line by its index in the combined list.
    pub fn remove_kelan_line(&mut self, index: usize) -> CoreResult<SplitLine> {
        let computed = self.computed_kelan_count();
        if index < computed {
            return Err(CoreError::ComputedLineImmutable { index });
        }
        let manual_index = index - computed;
        if manual_index >= self.manual_kelan.len() {
            return Err(CoreError::EntryNotFound { kind: "kelan", index });
        }
        Ok(self.manual_kelan.remove(manual_index))
    }

    /// Number of computed lines currently leading the Thabrew ledger:
    /// the three fixed totals plus one per TB-owned phone.
    fn computed_thabrew_count(&self) -> usize {
        3 + self
            .phones
            .iter()
            .filter(|p| p.owner.is_shop_owned())
            .count()
    }

    /// The Kelan ledger always leads with the two profit totals.
    fn computed_kelan_count(&self) -> usize {
        2
    }

    // =========================================================================
    // Derived Ledgers
    // =========================================================================

    /// The full Thabrew ledger: computed lines regenerated from the sale
    /// lines, then the manual lines verbatim.
    pub fn thabrew_lines(&self) -> Vec<SplitLine> {
        let phone_share: Money = self.phones.iter().map(|p| p.figures.thabrew()).sum();
        let accessory_share: Money = self.accessories.iter().map(|a| a.figures.thabrew()).sum();
        let accessory_cost: Money = self.accessories.iter().map(|a| a.figures.cost()).sum();

        let mut lines = vec![
            SplitLine::computed(THABREW_PHONE_PROFIT, phone_share),
            SplitLine::computed(THABREW_ACCESSORY_PROFIT, accessory_share),
            SplitLine::computed(THABREW_ACCESSORY_COST, accessory_cost),
        ];

        // Thabrew fronted the acquisition cost of shop-owned phones
        for p in self.phones.iter().filter(|p| p.owner.is_shop_owned()) {
            lines.push(SplitLine::computed(
                format!("{} ({})", p.model, p.imei),
                p.figures.cost(),
            ));
        }

        lines.extend(self.manual_thabrew.iter().cloned());
        lines
    }

    /// The full Kelan ledger: computed lines, then manual lines verbatim.
    pub fn kelan_lines(&self) -> Vec<SplitLine> {
        let phone_share: Money = self.phones.iter().map(|p| p.figures.kelan()).sum();
        let accessory_share: Money = self.accessories.iter().map(|a| a.figures.kelan()).sum();

        let mut lines = vec![
            SplitLine::computed(KELAN_PHONE_PROFIT, phone_share),
            SplitLine::computed(KELAN_ACCESSORY_PROFIT, accessory_share),
        ];

        lines.extend(self.manual_kelan.iter().cloned());
        lines
    }

    // =========================================================================
    // Totals
    // =========================================================================

    /// Aggregates the totals stored on a saved report.
    ///
    /// The stakeholder totals are the sums of the respective ledger lines
    /// (computed and manual) - the one formula for stakeholder totals used
    /// everywhere downstream.
    pub fn totals(&self) -> ReportTotals {
        let sum =
            |amounts: &mut dyn Iterator<Item = Money>| amounts.fold(Money::zero(), |a, m| a + m);

        let phone_figures = || self.phones.iter().map(|p| &p.figures);
        let accessory_figures = || self.accessories.iter().map(|a| &a.figures);

        ReportTotals {
            phone_revenue_cents: sum(&mut phone_figures().map(|f| f.revenue())).cents(),
            phone_cost_cents: sum(&mut phone_figures().map(|f| f.cost())).cents(),
            phone_profit_cents: sum(&mut phone_figures().map(|f| f.profit())).cents(),
            accessory_revenue_cents: sum(&mut accessory_figures().map(|f| f.revenue())).cents(),
            accessory_cost_cents: sum(&mut accessory_figures().map(|f| f.cost())).cents(),
            accessory_profit_cents: sum(&mut accessory_figures().map(|f| f.profit())).cents(),
            thabrew_phone_cents: sum(&mut phone_figures().map(|f| f.thabrew())).cents(),
            thabrew_accessory_cents: sum(&mut accessory_figures().map(|f| f.thabrew())).cents(),
            thabrew_total_cents: self
                .thabrew_lines()
                .iter()
                .map(SplitLine::amount)
                .sum::<Money>()
                .cents(),
            kelan_phone_cents: sum(&mut phone_figures().map(|f| f.kelan())).cents(),
            kelan_accessory_cents: sum(&mut accessory_figures().map(|f| f.kelan())).cents(),
            kelan_total_cents: self
                .kelan_lines()
                .iter()
                .map(SplitLine::amount)
                .sum::<Money>()
                .cents(),
        }
    }

    /// Snapshots the worksheet into a persistable report.
    ///
    /// `now` stamps both timestamps; on update the repository keeps the
    /// original `created_at`.
    pub fn to_report(&self, id: impl Into<String>, now: DateTime<Utc>) -> ProfitReport {
        ProfitReport {
            id: id.into(),
            report_date: self.report_date,
            phone_entries: self.phones.clone(),
            accessory_entries: self.accessories.clone(),
            thabrew_entries: self.thabrew_lines(),
            kelan_entries: self.kelan_lines(),
            totals: self.totals(),
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 14).unwrap()
    }

    fn tb_iphone() -> PhoneSaleInput {
        PhoneSaleInput {
            model: "iPhone 14".into(),
            imei: "123456789012345".into(),
            colour: "Black".into(),
            owner: "TB".into(),
            code: Some("1234".into()),
            revenue_cents: Money::from_rupees(100_000).cents(),
            cost_cents: Money::from_rupees(80_000).cents(),
        }
    }

    fn customer_phone() -> PhoneSaleInput {
        PhoneSaleInput {
            model: "Galaxy S23".into(),
            imei: "490154203237518".into(),
            colour: "Green".into(),
            owner: "Nimal".into(),
            code: None,
            revenue_cents: Money::from_rupees(50_000).cents(),
            cost_cents: Money::from_rupees(45_000).cents(),
        }
    }

    fn charger() -> AccessorySaleInput {
        AccessorySaleInput {
            model: "20W Charger".into(),
            revenue_cents: Money::from_rupees(3_000).cents(),
            cost_cents: Money::from_rupees(2_000).cents(),
        }
    }

    #[test]
    fn test_tb_phone_scenario() {
        // Sale: revenue 100,000, cost 80,000, owner TB
        // → profit 20,000, thabrew 16,000, kelan 4,000
        let mut ws = Worksheet::new(date());
        ws.add_phone(tb_iphone()).unwrap();

        let thabrew = ws.thabrew_lines();
        assert_eq!(thabrew[0].description, THABREW_PHONE_PROFIT);
        assert_eq!(thabrew[0].amount(), Money::from_rupees(16_000));
        // TB-owned: the phone's cost comes back to Thabrew as its own line
        assert_eq!(thabrew[3].description, "iPhone 14 (123456789012345)");
        assert_eq!(thabrew[3].amount(), Money::from_rupees(80_000));
        assert_eq!(thabrew.len(), 4);

        let kelan = ws.kelan_lines();
        assert_eq!(kelan[0].description, KELAN_PHONE_PROFIT);
        assert_eq!(kelan[0].amount(), Money::from_rupees(4_000));
        assert_eq!(kelan.len(), 2);
        // No cost line on the Kelan side
        assert!(kelan.iter().all(|l| !l.description.contains("iPhone")));
    }

    #[test]
    fn test_non_tb_phone_gets_no_cost_line() {
        let mut ws = Worksheet::new(date());
        ws.add_phone(customer_phone()).unwrap();

        let thabrew = ws.thabrew_lines();
        assert_eq!(thabrew.len(), 3); // only the fixed computed lines
        assert_eq!(thabrew[0].amount(), Money::from_rupees(4_000)); // 80% of 5,000
    }

    #[test]
    fn test_accessory_cost_charged_to_thabrew() {
        let mut ws = Worksheet::new(date());
        ws.add_accessory(charger()).unwrap();

        let thabrew = ws.thabrew_lines();
        assert_eq!(thabrew[1].description, THABREW_ACCESSORY_PROFIT);
        assert_eq!(thabrew[1].amount(), Money::from_rupees(800));
        assert_eq!(thabrew[2].description, THABREW_ACCESSORY_COST);
        assert_eq!(thabrew[2].amount(), Money::from_rupees(2_000));

        let kelan = ws.kelan_lines();
        assert_eq!(kelan[1].amount(), Money::from_rupees(200));
    }

    #[test]
    fn test_ledger_regeneration_is_idempotent() {
        let mut ws = Worksheet::new(date());
        ws.add_phone(tb_iphone()).unwrap();
        ws.add_accessory(charger()).unwrap();
        ws.add_manual_thabrew("Shop rent", Money::from_rupees(-10_000)).unwrap();

        assert_eq!(ws.thabrew_lines(), ws.thabrew_lines());
        assert_eq!(ws.kelan_lines(), ws.kelan_lines());
        assert_eq!(ws.totals(), ws.totals());
    }

    #[test]
    fn test_profit_share_lines_conserve_total_profit() {
        // With external-party phones and free accessories, every computed
        // line is a profit share, so the two ledgers sum to the total profit.
        let mut ws = Worksheet::new(date());
        ws.add_phone(customer_phone()).unwrap();
        ws.add_accessory(AccessorySaleInput {
            model: "Sticker".into(),
            revenue_cents: 777,
            cost_cents: 0,
        })
        .unwrap();

        let total_profit: Money = ws
            .phones()
            .iter()
            .map(|p| p.figures.profit())
            .chain(ws.accessories().iter().map(|a| a.figures.profit()))
            .sum();
        let ledger_sum: Money = ws
            .thabrew_lines()
            .iter()
            .chain(ws.kelan_lines().iter())
            .map(SplitLine::amount)
            .sum();

        assert_eq!(ledger_sum, total_profit);
    }

    #[test]
    fn test_manual_lines_survive_recomputation() {
        let mut ws = Worksheet::new(date());
        ws.add_manual_kelan("Advance", Money::from_rupees(1_000)).unwrap();
        ws.add_phone(tb_iphone()).unwrap(); // mutation after the manual add

        let kelan = ws.kelan_lines();
        let manual: Vec<_> = kelan.iter().filter(|l| l.manual).collect();
        assert_eq!(manual.len(), 1);
        assert_eq!(manual[0].description, "Advance");
        // Manual lines always trail the computed subset
        assert!(kelan.last().unwrap().manual);
    }

    #[test]
    fn test_manual_line_requires_description() {
        let mut ws = Worksheet::new(date());
        assert!(ws.add_manual_thabrew("  ", Money::zero()).is_err());
        assert!(ws.thabrew_lines().iter().all(|l| !l.manual));
    }

    #[test]
    fn test_computed_lines_cannot_be_removed() {
        let mut ws = Worksheet::new(date());
        ws.add_phone(tb_iphone()).unwrap();
        ws.add_manual_thabrew("Adjustment", Money::from_rupees(500)).unwrap();

        // Indices 0..=3 are computed (3 fixed + 1 TB phone line)
        assert!(matches!(
            ws.remove_thabrew_line(0),
            Err(CoreError::ComputedLineImmutable { .. })
        ));
        assert!(matches!(
            ws.remove_thabrew_line(3),
            Err(CoreError::ComputedLineImmutable { .. })
        ));

        // Index 4 is the manual line
        let removed = ws.remove_thabrew_line(4).unwrap();
        assert_eq!(removed.description, "Adjustment");
        assert!(ws.remove_thabrew_line(4).is_err()); // now gone
    }

    #[test]
    fn test_update_and_remove_sale_lines() {
        let mut ws = Worksheet::new(date());
        ws.add_phone(tb_iphone()).unwrap();

        let mut edit = customer_phone();
        edit.code = Some("TDY-1234".into());
        ws.update_phone(0, edit).unwrap();
        assert_eq!(ws.phones()[0].model, "Galaxy S23");

        assert!(matches!(
            ws.update_phone(5, tb_iphone()),
            Err(CoreError::EntryNotFound { kind: "phone", .. })
        ));

        let removed = ws.remove_phone(0).unwrap();
        assert_eq!(removed.model, "Galaxy S23");
        assert!(ws.remove_phone(0).is_err());
    }

    #[test]
    fn test_invalid_update_leaves_line_untouched() {
        let mut ws = Worksheet::new(date());
        ws.add_phone(tb_iphone()).unwrap();

        let mut bad = customer_phone();
        bad.model = "".into();
        assert!(ws.update_phone(0, bad).is_err());
        assert_eq!(ws.phones()[0].model, "iPhone 14");
    }

    #[test]
    fn test_totals() {
        let mut ws = Worksheet::new(date());
        ws.add_phone(tb_iphone()).unwrap();
        ws.add_phone(customer_phone()).unwrap();
        ws.add_accessory(charger()).unwrap();
        ws.add_manual_kelan("Bonus", Money::from_rupees(1_000)).unwrap();

        let totals = ws.totals();
        assert_eq!(totals.phone_revenue_cents, Money::from_rupees(150_000).cents());
        assert_eq!(totals.phone_cost_cents, Money::from_rupees(125_000).cents());
        assert_eq!(totals.phone_profit_cents, Money::from_rupees(25_000).cents());
        assert_eq!(totals.accessory_profit_cents, Money::from_rupees(1_000).cents());
        assert_eq!(totals.thabrew_phone_cents, Money::from_rupees(20_000).cents());
        assert_eq!(totals.kelan_phone_cents, Money::from_rupees(5_000).cents());

        // thabrew_total = 20,000 + 800 + 2,000 (acc cost) + 80,000 (TB phone)
        assert_eq!(
            totals.thabrew_total_cents,
            Money::from_rupees(102_800).cents()
        );
        // kelan_total = 5,000 + 200 + 1,000 manual
        assert_eq!(totals.kelan_total_cents, Money::from_rupees(6_200).cents());
    }

    #[test]
    fn test_report_roundtrip_preserves_manual_subset() {
        let mut ws = Worksheet::new(date());
        ws.add_phone(tb_iphone()).unwrap();
        ws.add_accessory(charger()).unwrap();
        ws.add_manual_thabrew("Rent", Money::from_rupees(-5_000)).unwrap();
        ws.add_manual_kelan("Advance", Money::from_rupees(2_000)).unwrap();

        let report = ws.to_report("r1", Utc::now());
        assert_eq!(report.thabrew_entries.len(), 5); // 3 fixed + TB line + manual
        assert_eq!(report.kelan_entries.len(), 3);

        let reloaded = Worksheet::from_report(&report);
        assert_eq!(reloaded.phones().len(), 1);
        assert_eq!(reloaded.accessories().len(), 1);
        // Only the manual subset came back as editable state...
        assert_eq!(reloaded.manual_thabrew.len(), 1);
        assert_eq!(reloaded.manual_kelan.len(), 1);
        // ...and the regenerated ledgers match what was saved
        assert_eq!(reloaded.thabrew_lines(), report.thabrew_entries);
        assert_eq!(reloaded.kelan_lines(), report.kelan_entries);
        assert_eq!(reloaded.totals(), report.totals);
    }
}
