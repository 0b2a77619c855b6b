//! レイアウト設定モジュール
//!
//! mm基準のレポートページ定義

// ============================================
// mm基準レイアウト
// ============================================

/// A4サイズ（mm）
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// 余白（mm）
pub const MARGIN_MM: f32 = 15.0;

/// 利用可能幅（mm）
pub const USABLE_WIDTH_MM: f32 = A4_WIDTH_MM - MARGIN_MM * 2.0; // 180mm

/// 写真枠（mm）
pub const PHOTO_HEIGHT_MM: f32 = 110.0;

/// 判定帯・純度バーの高さ（mm）
pub const VERDICT_BAND_MM: f32 = 14.0;
pub const PURITY_BAR_MM: f32 = 6.0;

/// 情報欄の行間（mm）
pub const FIELD_ROW_MM: f32 = 7.0;

// ============================================
// 変換係数
// ============================================

/// mm → pt変換 (1mm = 72/25.4 pt)
pub const MM_TO_PT: f32 = 72.0 / 25.4;

pub fn mm_to_pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

// ============================================
// カード画像
// ============================================

/// 共有カードの幅（px）
pub const CARD_WIDTH_PX: u32 = 600;
/// 判定帯の高さ（px）
pub const CARD_BAND_PX: u32 = 72;
/// 純度バーの高さ（px）
pub const CARD_BAR_PX: u32 = 16;
