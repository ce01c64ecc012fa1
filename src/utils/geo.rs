//! Cálculo de distancias geográficas
//!
//! Distancia de gran círculo (Haversine) entre pares de coordenadas.
//! Entrada en grados, salida en kilómetros.

/// Radio medio de la Tierra en kilómetros
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distancia Haversine entre dos puntos (lat, lon) en grados.
/// Devuelve 0.0 para puntos idénticos y es estable en puntos antipodales.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    // clamp protege contra a > 1 por error de redondeo en puntos antipodales
    let c = 2.0 * a.sqrt().clamp(0.0, 1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Distancia acumulada de una secuencia ordenada de puntos GPS
pub fn cumulative_distance_km(points: &[(f64, f64)]) -> f64 {
    points
        .windows(2)
        .map(|pair| haversine_km(pair[0], pair[1]))
        .sum()
}
