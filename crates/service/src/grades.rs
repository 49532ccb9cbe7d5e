/// Arithmetic mean of a sequence of grades; `None` when the sequence is empty.
pub fn mean<I>(grades: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = grades
        .into_iter()
        .fold((0.0_f64, 0_usize), |(sum, count), g| (sum + g, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
