use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{Amount, Category, Entry, EntryType};

const SEED_DESCRIPTION: &str = "Qualquer descrição para essa despesa";

/// Development dataset: five categories and six entries referencing them
pub fn dataset() -> (Vec<Category>, Vec<Entry>) {
    let categories: Vec<Category> = [
        ("Moradia", "Pagamentos de Contas da Casa"),
        ("Saúde", "Plano de Saúde e Remédios"),
        ("Lazer", "Cinema, parques, praia, etc"),
        ("Salário", "Recebimento de Salário"),
        ("Freelas", "Trabalhos como freelancer"),
    ]
    .iter()
    .zip(1..)
    .map(|((name, description), id)| Category {
        id: Some(id),
        name: name.to_string(),
        description: Some(description.to_string()),
    })
    .collect();

    let date = NaiveDate::from_ymd_opt(2018, 10, 14).unwrap_or_default();
    let amount = Amount::new(Decimal::new(7080, 2));

    let entries = [
        ("Gás de cozinha", 1, true, EntryType::Expense),
        ("Remédios demais", 2, false, EntryType::Expense),
        ("Cineminha da massa", 3, true, EntryType::Expense),
        ("Ganhos demais", 4, false, EntryType::Revenue),
        ("Ganhos mais que demais", 5, true, EntryType::Revenue),
        ("Mais mais ganhos demais", 5, false, EntryType::Revenue),
    ]
    .iter()
    .zip(1..)
    .map(|(&(name, category_id, paid, entry_type), id)| Entry {
        id: Some(id),
        name: name.to_string(),
        description: Some(SEED_DESCRIPTION.to_string()),
        entry_type,
        amount,
        date,
        paid,
        category_id,
        category: None,
    })
    .collect();

    (categories, entries)
}
