// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Built-in course catalog used to seed a fresh database.

use crate::types::Modality;

/// A session to create for a seeded course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSeed {
    pub code: &'static str,
    pub weekday: &'static str,
    pub start_time: &'static str,
    pub end_time: &'static str,
    pub level: &'static str,
    pub capacity: u32,
}

/// A payment plan to create for a seeded course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSeed {
    pub label: &'static str,
    pub months: u32,
    pub price_cents: i64,
}

/// A course with its sessions and plans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseSeed {
    pub code: &'static str,
    pub title: &'static str,
    pub modality: Modality,
    pub bonus_limit: Option<u32>,
    pub sessions: Vec<SessionSeed>,
    pub plans: Vec<PlanSeed>,
}

const fn session(
    code: &'static str,
    weekday: &'static str,
    start_time: &'static str,
    end_time: &'static str,
    level: &'static str,
    capacity: u32,
) -> SessionSeed {
    SessionSeed {
        code,
        weekday,
        start_time,
        end_time,
        level,
        capacity,
    }
}

/// Standard plan ladder for a monthly price.
fn plans_for(monthly_cents: i64) -> Vec<PlanSeed> {
    let discounted = |months: i64, percent: i64| monthly_cents * months * (100 - percent) / 100;
    vec![
        PlanSeed {
            label: "Mensal",
            months: 1,
            price_cents: monthly_cents,
        },
        PlanSeed {
            label: "Bimestral (5% OFF)",
            months: 2,
            price_cents: discounted(2, 5),
        },
        PlanSeed {
            label: "Trimestral (5% OFF)",
            months: 3,
            price_cents: discounted(3, 5),
        },
        PlanSeed {
            label: "1º Semestre (5 meses)",
            months: 5,
            price_cents: discounted(5, 5),
        },
        PlanSeed {
            label: "2º Semestre (4 meses)",
            months: 4,
            price_cents: discounted(4, 5),
        },
        PlanSeed {
            label: "Anual (10% OFF)",
            months: 9,
            price_cents: discounted(9, 10),
        },
    ]
}

/// Returns the default catalog.
#[must_use]
pub fn default_catalog() -> Vec<CourseSeed> {
    const HIGH: &str = "Ensino Médio";
    const MIDDLE: &str = "Ensino Fundamental";

    vec![
        CourseSeed {
            code: "redacao",
            title: "Redação",
            modality: Modality::Redacao,
            bonus_limit: Some(10),
            sessions: vec![
                session("R1", "Terça-feira", "18:00", "19:30", HIGH, 18),
                session("R3", "Terça-feira", "19:30", "21:00", HIGH, 18),
                session("R2", "Quinta-feira", "18:00", "19:30", HIGH, 18),
                session("R4", "Quinta-feira", "19:30", "21:00", HIGH, 18),
                session("R5", "Sábado", "09:30", "11:00", HIGH, 20),
                session("R6", "Sábado", "11:00", "12:30", HIGH, 20),
                session("R7", "Sábado", "17:30", "19:00", HIGH, 18),
                session("R8", "Sábado", "14:30", "15:30", MIDDLE, 16),
                session("R9", "Sábado", "15:30", "17:00", MIDDLE, 16),
            ],
            plans: plans_for(30_000),
        },
        CourseSeed {
            code: "exatas",
            title: "Exatas (Química, Física e Matemática)",
            modality: Modality::Exatas,
            bonus_limit: None,
            sessions: vec![session("EX1", "Segunda-feira", "19:00", "22:00", HIGH, 24)],
            plans: plans_for(35_000),
        },
        CourseSeed {
            code: "matematica",
            title: "Matemática",
            modality: Modality::Matematica,
            bonus_limit: None,
            sessions: vec![
                session("M1", "Quarta-feira", "19:40", "20:10", HIGH, 16),
                session("M2", "Sábado", "07:30", "09:00", HIGH, 16),
                session("M3", "Sábado", "18:40", "19:40", MIDDLE, 16),
            ],
            plans: plans_for(30_000),
        },
        CourseSeed {
            code: "gramatica",
            title: "Gramática",
            modality: Modality::Gramatica,
            bonus_limit: None,
            sessions: vec![session("G1", "Sexta-feira", "19:30", "21:00", HIGH, 22)],
            plans: plans_for(30_000),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_session_codes_are_unique() {
        let catalog = default_catalog();
        let codes: Vec<&str> = catalog
            .iter()
            .flat_map(|c| c.sessions.iter().map(|s| s.code))
            .collect();
        let unique: HashSet<&str> = codes.iter().copied().collect();
        assert_eq!(codes.len(), unique.len());
    }

    #[test]
    fn test_only_redacao_has_a_bonus() {
        let with_bonus: Vec<&str> = default_catalog()
            .iter()
            .filter(|c| c.bonus_limit.is_some())
            .map(|c| c.code)
            .collect();
        assert_eq!(with_bonus, vec!["redacao"]);
    }

    #[test]
    fn test_plan_prices_follow_the_discount_ladder() {
        let exatas = default_catalog()
            .into_iter()
            .find(|c| c.code == "exatas")
            .map(|c| c.plans)
            .unwrap_or_default();
        let prices: Vec<i64> = exatas.iter().map(|p| p.price_cents).collect();
        assert_eq!(
            prices,
            vec![35_000, 66_500, 99_750, 166_250, 133_000, 283_500]
        );
    }
}
