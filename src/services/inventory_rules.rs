//! Regla de stock bajo: una pieza está en estado crítico cuando su
//! cantidad es menor o igual que su punto de pedido.

use crate::store::Filter;

pub fn is_low_stock(quantity: i32, reorder_point: i32) -> bool {
    quantity <= reorder_point
}

/// La misma regla expresada como filtro del store (columna contra columna)
pub fn low_stock_filter() -> Filter {
    Filter::column_lte("quantity", "reorder_point")
}
