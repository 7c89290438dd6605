//! Province and scenario context of the dashboard.
//!
//! The context only labels what is shown; it does not change how the
//! sample registry resolves nodes. Model results are looked up by the
//! province code.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::category::NATION;
use crate::error::ParseError;

/// A selectable province: UI id, model code and display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Province {
    pub id: &'static str,
    pub code: &'static str,
    pub name: &'static str,
}

/// The national entry, selectable alongside the provinces.
pub const NATION_PROVINCE: Province = Province {
    id: "nation",
    code: NATION,
    name: "全国",
};

pub const PROVINCES: [Province; 30] = [
    Province { id: "beijing", code: "BEIJ", name: "北京" },
    Province { id: "tianjin", code: "TIAN", name: "天津" },
    Province { id: "hebei", code: "HEBE", name: "河北" },
    Province { id: "shanxi", code: "SHNX", name: "山西" },
    Province { id: "neimenggu", code: "NEMO", name: "内蒙古" },
    Province { id: "liaoning", code: "LIAO", name: "辽宁" },
    Province { id: "jilin", code: "JILI", name: "吉林" },
    Province { id: "heilongjiang", code: "HEIL", name: "黑龙江" },
    Province { id: "shanghai", code: "SHAN", name: "上海" },
    Province { id: "jiangsu", code: "JINU", name: "江苏" },
    Province { id: "zhejiang", code: "ZHEJ", name: "浙江" },
    Province { id: "anhui", code: "ANHU", name: "安徽" },
    Province { id: "fujian", code: "FUJI", name: "福建" },
    Province { id: "jiangxi", code: "JINX", name: "江西" },
    Province { id: "shandong", code: "SHAD", name: "山东" },
    Province { id: "henan", code: "HENA", name: "河南" },
    Province { id: "hubei", code: "HUBE", name: "湖北" },
    Province { id: "hunan", code: "HUNA", name: "湖南" },
    Province { id: "guangdong", code: "GUAD", name: "广东" },
    Province { id: "guangxi", code: "GUAX", name: "广西" },
    Province { id: "hainan", code: "HAIN", name: "海南" },
    Province { id: "chongqing", code: "CHON", name: "重庆" },
    Province { id: "sichuan", code: "SICH", name: "四川" },
    Province { id: "guizhou", code: "GUIZ", name: "贵州" },
    Province { id: "yunnan", code: "YUNN", name: "云南" },
    Province { id: "shaanxi", code: "SHAA", name: "陕西" },
    Province { id: "gansu", code: "GANS", name: "甘肃" },
    Province { id: "qinghai", code: "QING", name: "青海" },
    Province { id: "ningxia", code: "NINX", name: "宁夏" },
    Province { id: "xinjiang", code: "XING", name: "新疆" },
];

impl Province {
    /// Iterate the national entry followed by every province.
    pub fn all() -> impl Iterator<Item = &'static Province> {
        std::iter::once(&NATION_PROVINCE).chain(PROVINCES.iter())
    }

    /// Look up by UI id (`"beijing"`) or model code (`"BEIJ"`).
    pub fn find(key: &str) -> Option<&'static Province> {
        let key = key.trim();
        Province::all().find(|p| p.id.eq_ignore_ascii_case(key) || p.code.eq_ignore_ascii_case(key))
    }

    /// Display name for a model code, falling back to the code itself.
    pub fn name_for_code(code: &str) -> &str {
        Province::all()
            .find(|p| p.code == code)
            .map(|p| p.name)
            .unwrap_or(code)
    }
}

/// Policy scenario the dataset belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Carbon neutrality by 2060
    #[default]
    Cn60,
}

impl Scenario {
    pub fn id(&self) -> &'static str {
        match self {
            Scenario::Cn60 => "cn60",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Scenario::Cn60 => "CN60碳中和",
        }
    }
}

impl FromStr for Scenario {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cn60" => Ok(Scenario::Cn60),
            _ => Err(ParseError::Scenario(s.to_string())),
        }
    }
}

/// The selection a dataset is shown under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayContext {
    pub province: &'static Province,
    pub scenario: Scenario,
}

impl DisplayContext {
    pub fn new(province: &'static Province, scenario: Scenario) -> Self {
        Self { province, scenario }
    }

    /// Caption shown above the data table.
    pub fn caption(&self) -> String {
        format!(
            "展示 {} 在 {} 情景下的数据。",
            self.province.name,
            self.scenario.label()
        )
    }
}
