#![allow(dead_code)]

pub mod tiers;
