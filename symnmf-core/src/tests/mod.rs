mod test_similarity;
