//! In-place O(n^2) comparison sorts.

/// Bubble sort: compares neighbours and swaps them when out of order.
///
/// After pass `i` the largest `i + 1` elements sit at the end.
///
/// # Examples
///
/// ```
/// use u_qubo::sort::bubble_sort;
///
/// let mut data = [6, 15, 4, 2, 8, 5, 11, 9, 7, 13];
/// bubble_sort(&mut data);
/// assert_eq!(data, [2, 4, 5, 6, 7, 8, 9, 11, 13, 15]);
/// ```
pub fn bubble_sort<T: PartialOrd>(data: &mut [T]) {
    let n = data.len();
    for i in 0..n {
        for j in 0..n - i - 1 {
            if data[j] > data[j + 1] {
                data.swap(j, j + 1);
            }
        }
    }
}

/// Selection sort: moves the first minimum of the unsorted suffix to its
/// front.
///
/// # Examples
///
/// ```
/// use u_qubo::sort::selection_sort;
///
/// let mut data = vec![6.0, 15.0, 4.0, 2.0];
/// selection_sort(&mut data);
/// assert_eq!(data, vec![2.0, 4.0, 6.0, 15.0]);
/// ```
pub fn selection_sort<T: PartialOrd>(data: &mut [T]) {
    for i in 0..data.len() {
        let mut min = i;
        for j in i + 1..data.len() {
            if data[j] < data[min] {
                min = j;
            }
        }
        data.swap(i, min);
    }
}
